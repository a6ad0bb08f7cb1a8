//! Derived habit statistics.
//!
//! Everything in this module is a pure function over a habit's metadata and
//! its completion records; callers inject "now" so results are deterministic.
//! Handlers fetch a snapshot through `HabitStore` and hand it in; nothing
//! here touches the database.
//!
//! Two deliberate properties worth knowing before changing anything:
//! - Streaks and completion rates count calendar days. `active_days` only
//!   drives scheduling (`is_active_on`) and never gates the math, so a
//!   weekday-only habit still breaks its streak over a weekend gap.
//! - The completion rate is not clamped above 100. Seeded or imported
//!   completions dated before the habit's creation can push it over; callers
//!   should read >100 as a data-integrity signal.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::models::completion::Completion;
use crate::models::habit::{Habit, HabitWithStats};

/// Fallback schedule when `active_days` cannot be decoded: Monday-Friday.
pub const DEFAULT_ACTIVE_DAYS: [u8; 5] = [1, 2, 3, 4, 5];

const SECS_PER_DAY: i64 = 86_400;

/// The derived values attached to a habit on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitStats {
    pub streak: u32,
    pub completion_rate: f64,
    pub is_completed_today: bool,
    pub last_completed_date: Option<NaiveDate>,
}

/// Decode the stored `active_days` JSON into weekday numbers (0=Sunday).
///
/// Never fails: a string that does not parse, parses to an empty array, or
/// contains anything outside 0..=6 falls back to [`DEFAULT_ACTIVE_DAYS`].
pub fn parse_active_days(raw: &str) -> Vec<u8> {
    match serde_json::from_str::<Vec<i64>>(raw) {
        Ok(days) if !days.is_empty() && days.iter().all(|d| (0..=6).contains(d)) => {
            days.into_iter().map(|d| d as u8).collect()
        }
        _ => DEFAULT_ACTIVE_DAYS.to_vec(),
    }
}

/// Whether the habit is due on the given date per its weekday schedule.
///
/// Scheduling only; streak and rate computations ignore this on purpose.
pub fn is_active_on(habit: &Habit, date: NaiveDate) -> bool {
    let weekday = date.weekday().num_days_from_sunday() as u8;
    parse_active_days(&habit.active_days).contains(&weekday)
}

/// Count of consecutive calendar days with a true completion, walking
/// backwards from the most recent one. A gap of any kind (a missing day or
/// a `completed = false` record) ends the walk.
///
/// Note the anchor is the most recent completion, not today: a habit last
/// completed a week ago still reports the streak it had then.
pub fn compute_streak(completions: &[Completion]) -> u32 {
    let mut dates: Vec<NaiveDate> = completions
        .iter()
        .filter(|c| c.completed)
        .map(|c| c.completion_date)
        .collect();

    dates.sort_unstable_by(|a, b| b.cmp(a));

    let Some((&latest, rest)) = dates.split_first() else {
        return 0;
    };

    let mut streak = 1u32;
    let mut cursor = latest;
    for &date in rest {
        if date == cursor - Duration::days(1) {
            streak += 1;
            cursor = date;
        } else {
            break;
        }
    }

    streak
}

/// Calendar days a habit has existed, rounded up, floored at one so a habit
/// created moments ago already counts a full day. `None` (no creation
/// timestamp on record) yields zero, which zeroes the completion rate.
pub fn lifetime_days(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    let Some(created_at) = created_at else {
        return 0;
    };

    let secs = (now - created_at).num_seconds().max(0);
    ((secs + SECS_PER_DAY - 1) / SECS_PER_DAY).max(1)
}

/// Percentage of days since creation with a true completion, in 0..=100 under
/// normal data. The denominator is lifetime calendar days, not scheduled
/// days, so a weekday-only habit is still rated against seven-day weeks.
pub fn completion_rate(
    created_at: Option<DateTime<Utc>>,
    completions: &[Completion],
    now: DateTime<Utc>,
) -> f64 {
    let total_days = lifetime_days(created_at, now);
    if total_days <= 0 {
        return 0.0;
    }

    let completed_days = completions.iter().filter(|c| c.completed).count();
    (completed_days as f64 / total_days as f64) * 100.0
}

/// True iff a record for `today` exists with `completed = true`. A record
/// with `completed = false` reads the same as no record.
pub fn is_completed_today(completions: &[Completion], today: NaiveDate) -> bool {
    completions
        .iter()
        .any(|c| c.completion_date == today && c.completed)
}

/// Most recent date with a true completion, if any.
pub fn last_completed_date(completions: &[Completion]) -> Option<NaiveDate> {
    completions
        .iter()
        .filter(|c| c.completed)
        .map(|c| c.completion_date)
        .max()
}

/// Derive the full stats bundle for one habit.
pub fn compute_stats(habit: &Habit, completions: &[Completion], now: DateTime<Utc>) -> HabitStats {
    let today = now.date_naive();

    HabitStats {
        streak: compute_streak(completions),
        completion_rate: completion_rate(Some(habit.created_at), completions, now),
        is_completed_today: is_completed_today(completions, today),
        last_completed_date: last_completed_date(completions),
    }
}

/// Convenience for handlers: consume the habit row and wrap it with stats.
pub fn with_stats(habit: Habit, completions: &[Completion], now: DateTime<Utc>) -> HabitWithStats {
    let stats = compute_stats(&habit, completions, now);
    HabitWithStats::new(habit, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::habit::HabitFrequency;
    use chrono::TimeZone;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(s: &str, completed: bool) -> Completion {
        Completion {
            id: 0,
            habit_id: 1,
            completion_date: date(s),
            completed,
        }
    }

    fn noon(s: &str) -> DateTime<Utc> {
        Utc.from_utc_datetime(&date(s).and_hms_opt(12, 0, 0).unwrap())
    }

    fn habit(active_days: &str, created_at: DateTime<Utc>) -> Habit {
        Habit {
            id: 1,
            name: "Morning Meditation".into(),
            description: None,
            frequency: HabitFrequency::Daily,
            reminder_time: None,
            active_days: active_days.into(),
            created_at,
            is_archived: false,
        }
    }

    #[test]
    fn streak_of_empty_history_is_zero() {
        assert_eq!(compute_streak(&[]), 0);
    }

    #[test]
    fn streak_counts_consecutive_days() {
        let completions = vec![
            record("2026-08-01", true),
            record("2026-08-02", true),
            record("2026-08-03", true),
            record("2026-08-04", true),
            record("2026-08-05", true),
        ];
        assert_eq!(compute_streak(&completions), 5);
    }

    #[test]
    fn streak_is_order_independent() {
        let completions = vec![
            record("2026-08-04", true),
            record("2026-08-02", true),
            record("2026-08-05", true),
            record("2026-08-03", true),
        ];
        assert_eq!(compute_streak(&completions), 4);
    }

    #[test]
    fn gap_truncates_streak_to_days_after_it() {
        let completions = vec![
            record("2026-08-01", true),
            record("2026-08-02", true),
            // 2026-08-03 missing
            record("2026-08-04", true),
            record("2026-08-05", true),
        ];
        assert_eq!(compute_streak(&completions), 2);
    }

    #[test]
    fn false_record_breaks_streak_like_a_missing_day() {
        let completions = vec![
            record("2026-08-01", true),
            record("2026-08-02", true),
            record("2026-08-03", false),
            record("2026-08-04", true),
            record("2026-08-05", true),
        ];
        assert_eq!(compute_streak(&completions), 2);
    }

    #[test]
    fn streak_anchors_at_most_recent_completion_not_today() {
        // A single completion last week still counts as a 1-day streak.
        let completions = vec![record("2026-07-29", true)];
        assert_eq!(compute_streak(&completions), 1);
    }

    #[test]
    fn streak_ignores_active_day_schedule() {
        // Weekday-only habit completed Friday and the following Monday: the
        // weekend gap still breaks the run even though nothing was due.
        let completions = vec![
            record("2026-07-31", true), // Friday
            record("2026-08-03", true), // Monday
        ];
        assert_eq!(compute_streak(&completions), 1);
    }

    #[test]
    fn lifetime_days_floors_at_one() {
        let now = noon("2026-08-05");
        assert_eq!(lifetime_days(Some(now), now), 1);
    }

    #[test]
    fn lifetime_days_rounds_partial_days_up() {
        let created = noon("2026-08-01");
        let now = Utc.from_utc_datetime(&date("2026-08-05").and_hms_opt(9, 0, 0).unwrap());
        // 3 days and 21 hours rounds up to 4.
        assert_eq!(lifetime_days(Some(created), now), 4);
    }

    #[test]
    fn lifetime_days_without_creation_timestamp_is_zero() {
        assert_eq!(lifetime_days(None, noon("2026-08-05")), 0);
    }

    #[test]
    fn completion_rate_over_lifetime() {
        let created = noon("2026-07-22"); // exactly 14 days before now
        let now = noon("2026-08-05");
        let completions: Vec<Completion> = (1..=5)
            .map(|d| record(&format!("2026-08-{d:02}"), true))
            .collect();

        let rate = completion_rate(Some(created), &completions, now);
        assert!((rate - (5.0 / 14.0) * 100.0).abs() < 1e-9);
    }

    #[test]
    fn completion_rate_ignores_false_records() {
        let created = noon("2026-07-26"); // 10 days
        let now = noon("2026-08-05");
        let completions = vec![
            record("2026-08-04", true),
            record("2026-08-05", false),
        ];
        let rate = completion_rate(Some(created), &completions, now);
        assert!((rate - 10.0).abs() < 1e-9);
    }

    #[test]
    fn completion_rate_without_creation_timestamp_is_zero() {
        let completions = vec![record("2026-08-05", true)];
        assert_eq!(completion_rate(None, &completions, noon("2026-08-05")), 0.0);
    }

    #[test]
    fn completion_rate_is_not_clamped_above_one_hundred() {
        // Completions predating creation (seeded data) inflate the numerator.
        let now = noon("2026-08-05");
        let completions = vec![
            record("2026-08-03", true),
            record("2026-08-04", true),
            record("2026-08-05", true),
        ];
        let rate = completion_rate(Some(now), &completions, now);
        assert!((rate - 300.0).abs() < 1e-9);
    }

    #[test]
    fn completed_today_requires_a_true_record_for_today() {
        let today = date("2026-08-05");
        assert!(!is_completed_today(&[], today));
        assert!(!is_completed_today(&[record("2026-08-04", true)], today));
        assert!(!is_completed_today(&[record("2026-08-05", false)], today));
        assert!(is_completed_today(&[record("2026-08-05", true)], today));
    }

    #[test]
    fn last_completed_date_is_the_max_true_date() {
        let completions = vec![
            record("2026-08-01", true),
            record("2026-08-03", true),
            record("2026-08-05", false),
        ];
        assert_eq!(last_completed_date(&completions), Some(date("2026-08-03")));
        assert_eq!(last_completed_date(&[]), None);
        assert_eq!(last_completed_date(&[record("2026-08-05", false)]), None);
    }

    #[test]
    fn active_days_round_trip() {
        assert_eq!(parse_active_days("[1,2,3,4,5,6,0]"), vec![1, 2, 3, 4, 5, 6, 0]);
        assert_eq!(parse_active_days("[0,6]"), vec![0, 6]);
    }

    #[test]
    fn malformed_active_days_fall_back_to_weekdays() {
        assert_eq!(parse_active_days("not json"), DEFAULT_ACTIVE_DAYS.to_vec());
        assert_eq!(parse_active_days(""), DEFAULT_ACTIVE_DAYS.to_vec());
        assert_eq!(parse_active_days("[]"), DEFAULT_ACTIVE_DAYS.to_vec());
        assert_eq!(parse_active_days("[7]"), DEFAULT_ACTIVE_DAYS.to_vec());
        assert_eq!(parse_active_days("[-1,2]"), DEFAULT_ACTIVE_DAYS.to_vec());
        assert_eq!(parse_active_days("{\"days\":[1]}"), DEFAULT_ACTIVE_DAYS.to_vec());
    }

    #[test]
    fn is_active_on_follows_the_weekday_schedule() {
        let h = habit("[1,3,5]", noon("2026-07-01"));
        assert!(is_active_on(&h, date("2026-08-03"))); // Monday
        assert!(!is_active_on(&h, date("2026-08-04"))); // Tuesday
        assert!(is_active_on(&h, date("2026-08-05"))); // Wednesday
        assert!(!is_active_on(&h, date("2026-08-08"))); // Saturday
    }

    #[test]
    fn is_active_on_with_malformed_schedule_uses_weekdays() {
        let h = habit("oops", noon("2026-07-01"));
        assert!(is_active_on(&h, date("2026-08-03"))); // Monday
        assert!(!is_active_on(&h, date("2026-08-02"))); // Sunday
    }

    #[test]
    fn compute_stats_bundles_all_derivations() {
        let now = noon("2026-08-05");
        let h = habit("[1,2,3,4,5,6,0]", noon("2026-07-22"));
        let completions = vec![
            record("2026-08-03", true),
            record("2026-08-04", true),
            record("2026-08-05", true),
        ];

        let stats = compute_stats(&h, &completions, now);
        assert_eq!(stats.streak, 3);
        assert!((stats.completion_rate - (3.0 / 14.0) * 100.0).abs() < 1e-9);
        assert!(stats.is_completed_today);
        assert_eq!(stats.last_completed_date, Some(date("2026-08-05")));
    }

    #[test]
    fn compute_stats_of_brand_new_habit_is_all_zeroes() {
        let now = noon("2026-08-05");
        let h = habit("[1,2,3,4,5]", now);

        let stats = compute_stats(&h, &[], now);
        assert_eq!(stats.streak, 0);
        assert_eq!(stats.completion_rate, 0.0);
        assert!(!stats.is_completed_today);
        assert_eq!(stats.last_completed_date, None);
    }
}
