use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One per-day record for a habit. At most one row exists per
/// `(habit_id, completion_date)` pair; the toggle endpoint upserts on that
/// key. `completed = false` means tracked-but-missed, which is distinct from
/// having no row at all.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub id: i32,
    pub habit_id: i32,
    pub completion_date: NaiveDate,
    pub completed: bool,
}
