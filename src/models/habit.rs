use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::services::stats::HabitStats;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub frequency: HabitFrequency,
    /// `HH:MM`, display-only; never feeds into stats.
    pub reminder_time: Option<String>,
    /// JSON-encoded array of weekday numbers (0=Sunday..6=Saturday), stored
    /// verbatim. Decoding happens in `services::stats::parse_active_days`.
    pub active_days: String,
    pub created_at: DateTime<Utc>,
    pub is_archived: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "habit_frequency", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HabitFrequency {
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl Default for HabitFrequency {
    fn default() -> Self {
        Self::Daily
    }
}

/// Insert payload for the habits table. `created_at` is only ever set by the
/// seeder; regular creation lets the database default it to now.
#[derive(Debug, Clone)]
pub struct NewHabit {
    pub name: String,
    pub description: Option<String>,
    pub frequency: HabitFrequency,
    pub reminder_time: Option<String>,
    pub active_days: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Partial update for the habits table. `None` leaves a column untouched.
/// Archiving and `created_at` are deliberately not updatable here.
#[derive(Debug, Clone, Default)]
pub struct HabitUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<HabitFrequency>,
    pub reminder_time: Option<String>,
    pub active_days: Option<String>,
}

/// A habit together with its derived statistics, recomputed on every read.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitWithStats {
    #[serde(flatten)]
    pub habit: Habit,
    pub streak: u32,
    pub completion_rate: f64,
    pub is_completed_today: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_completed_date: Option<NaiveDate>,
}

impl HabitWithStats {
    pub fn new(habit: Habit, stats: HabitStats) -> Self {
        Self {
            habit,
            streak: stats.streak,
            completion_rate: stats.completion_rate,
            is_completed_today: stats.is_completed_today,
            last_completed_date: stats.last_completed_date,
        }
    }
}
