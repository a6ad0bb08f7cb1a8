//! Request/response DTOs.
//!
//! Conventions:
//! - `*Request` → deserialized from client JSON body or query params
//! - `*Response` / plain names → serialized to client JSON
//! - Field names are camelCase on the wire
//! - Validation is expressed via `validator` derive macros plus the explicit
//!   helpers below for shapes the derives cannot express

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::completion::Completion;
use crate::models::habit::{HabitFrequency, HabitWithStats};
use crate::services::stats;

// ============================================================================
// Habits
// ============================================================================

/// `activeDays` arrives either as a bare array of weekday numbers or as the
/// already-JSON-encoded string the habit rows carry; clients historically
/// sent both.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ActiveDaysInput {
    Days(Vec<i16>),
    Encoded(String),
}

impl ActiveDaysInput {
    /// Normalize to the stored TEXT representation.
    ///
    /// An explicit array is validated strictly (0=Sun..6=Sat, non-empty). An
    /// encoded string is decoded leniently: undecodable input degrades to
    /// the weekday default rather than erroring, matching how reads treat a
    /// corrupted column.
    pub fn into_stored(self) -> Result<String, String> {
        match self {
            ActiveDaysInput::Days(days) => {
                if days.is_empty() || days.len() > 7 {
                    return Err("activeDays requires 1-7 days".into());
                }
                for d in &days {
                    if !(0..=6).contains(d) {
                        return Err(format!("Day {} is invalid; must be 0-6 (Sun-Sat)", d));
                    }
                }
                serde_json::to_string(&days).map_err(|e| e.to_string())
            }
            ActiveDaysInput::Encoded(raw) => {
                let days = stats::parse_active_days(&raw);
                serde_json::to_string(&days).map_err(|e| e.to_string())
            }
        }
    }
}

/// POST /api/habits
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,

    /// Schedule frequency. Default: "daily". Informational only.
    pub frequency: Option<HabitFrequency>,

    /// Optional reminder time, `HH:MM`. Empty string means none.
    #[validate(custom = "validate_reminder_time")]
    pub reminder_time: Option<String>,

    /// Weekday schedule. Default: weekdays (Mon-Fri).
    pub active_days: Option<ActiveDaysInput>,
}

impl CreateHabitRequest {
    /// The original clients send `""` for "no reminder"; collapse that to
    /// NULL so reads have a single empty representation.
    pub fn normalized_reminder(&self) -> Option<String> {
        self.reminder_time
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    }
}

/// PATCH /api/habits/{id} — partial update, all fields optional.
/// Archive state has its own endpoint and cannot be changed here.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabitRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,

    pub frequency: Option<HabitFrequency>,

    #[validate(custom = "validate_reminder_time")]
    pub reminder_time: Option<String>,

    pub active_days: Option<ActiveDaysInput>,
}

// ============================================================================
// Completions
// ============================================================================

/// POST /api/habits/{id}/completions
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleCompletionRequest {
    /// Date to record. Default: today.
    pub date: Option<NaiveDate>,

    /// Default: true. Sending false records a tracked-but-missed day, which
    /// is not the same as deleting the record.
    pub completed: Option<bool>,
}

/// GET /api/completions query params: either `date`, or both `startDate`
/// and `endDate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionWindowQuery {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// GET /api/habits/{id}/heatmap query params
#[derive(Debug, Deserialize)]
pub struct HeatmapQuery {
    /// Number of months to fetch. Default: 3, max: 12.
    pub months: Option<i32>,
}

/// Single day in the calendar heatmap. Days with no record are simply
/// absent; `completed = false` marks a tracked-but-missed day.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapEntry {
    pub date: NaiveDate,
    pub completed: bool,
}

// ============================================================================
// Dashboard
// ============================================================================

/// GET /api/stats
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_habits: usize,
    pub completed_today: usize,
    pub max_streak: u32,
    /// Habits with a completion rate under 50%.
    pub needs_attention: usize,
    pub habits: Vec<HabitWithStats>,
    pub today_completions: Vec<Completion>,
}

// ============================================================================
// Validation helpers
// ============================================================================

fn validate_reminder_time(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    chrono::NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| ValidationError::new("reminder_time must be HH:MM"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_days_accepts_both_wire_shapes() {
        let from_array: ActiveDaysInput = serde_json::from_str("[1,3,5]").unwrap();
        assert_eq!(from_array.into_stored().unwrap(), "[1,3,5]");

        let from_string: ActiveDaysInput = serde_json::from_str("\"[1,2,3,4,5]\"").unwrap();
        assert_eq!(from_string.into_stored().unwrap(), "[1,2,3,4,5]");
    }

    #[test]
    fn explicit_array_is_validated_strictly() {
        assert!(ActiveDaysInput::Days(vec![]).into_stored().is_err());
        assert!(ActiveDaysInput::Days(vec![7]).into_stored().is_err());
        assert!(ActiveDaysInput::Days(vec![-1]).into_stored().is_err());
        assert!(ActiveDaysInput::Days(vec![0, 1, 2, 3, 4, 5, 6, 0])
            .into_stored()
            .is_err());
    }

    #[test]
    fn encoded_string_degrades_to_weekday_default() {
        let stored = ActiveDaysInput::Encoded("garbage".into())
            .into_stored()
            .unwrap();
        assert_eq!(stored, "[1,2,3,4,5]");
    }

    #[test]
    fn reminder_time_shape() {
        assert!(validate_reminder_time("").is_ok());
        assert!(validate_reminder_time("07:00").is_ok());
        assert!(validate_reminder_time("23:59").is_ok());
        assert!(validate_reminder_time("7am").is_err());
        assert!(validate_reminder_time("25:00").is_err());
    }
}
