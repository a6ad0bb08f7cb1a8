use chrono::{Datelike, Duration, Utc};

use crate::db::HabitStore;
use crate::models::habit::{HabitFrequency, NewHabit};
use crate::services::stats;

/// Sample habits for local development, backdated two weeks so the derived
/// stats have something to chew on. Runs only against an empty database.
pub async fn seed_sample_data(store: &HabitStore) -> anyhow::Result<()> {
    if store.count_habits().await? > 0 {
        tracing::info!("Database already has data, skipping seed");
        return Ok(());
    }

    let samples: [(&str, &str, Option<&str>, &str); 5] = [
        (
            "Morning Meditation",
            "10 minutes of mindfulness meditation",
            Some("07:00"),
            "[1,2,3,4,5,6,0]",
        ),
        (
            "Read 20 Pages",
            "Read at least 20 pages of a book",
            Some("20:00"),
            "[1,2,3,4,5]",
        ),
        (
            "Drink Water",
            "Drink at least 8 glasses of water",
            None,
            "[1,2,3,4,5,6,0]",
        ),
        (
            "Exercise",
            "30 minutes of exercise",
            Some("18:00"),
            "[1,3,5]",
        ),
        (
            "Journal",
            "Write in journal before bed",
            Some("21:00"),
            "[1,2,3,4,5]",
        ),
    ];

    let created_at = Utc::now() - Duration::days(14);
    let today = Utc::now().date_naive();

    for (name, description, reminder_time, active_days) in samples {
        let habit = store
            .create_habit(NewHabit {
                name: name.into(),
                description: Some(description.into()),
                frequency: HabitFrequency::Daily,
                reminder_time: reminder_time.map(str::to_owned),
                active_days: active_days.into(),
                created_at: Some(created_at),
            })
            .await?;

        // Fill the last 14 days, but only on scheduled days, with a bias
        // towards recent completions.
        let schedule = stats::parse_active_days(active_days);
        for i in 0..14i64 {
            let date = today - Duration::days(i);
            let weekday = date.weekday().num_days_from_sunday() as u8;
            if !schedule.contains(&weekday) {
                continue;
            }

            let probability = if i < 3 {
                0.8
            } else if i < 7 {
                0.7
            } else {
                0.5
            };
            let completed = rand::random::<f64>() < probability;

            store.toggle_completion(habit.id, date, completed).await?;
        }
    }

    tracing::info!("Database seeded successfully");
    Ok(())
}
