use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::completion::Completion;
use crate::models::habit::{Habit, HabitUpdate, NewHabit};

/// Repository over the habits and habit_completions tables. Handlers receive
/// this through `AppState` and never touch the pool directly; the stats
/// engine in turn only sees the rows fetched here.
#[derive(Clone)]
pub struct HabitStore {
    pool: PgPool,
}

impl HabitStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ping(&self) -> sqlx::Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    /// Non-archived habits, oldest first.
    pub async fn list_habits(&self) -> sqlx::Result<Vec<Habit>> {
        sqlx::query_as::<_, Habit>(
            r#"
            SELECT * FROM habits
            WHERE is_archived = false
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Fetch by id regardless of archive state, so archived habits stay
    /// reachable for unarchiving and history views.
    pub async fn get_habit(&self, id: i32) -> sqlx::Result<Option<Habit>> {
        sqlx::query_as::<_, Habit>("SELECT * FROM habits WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn create_habit(&self, new: NewHabit) -> sqlx::Result<Habit> {
        sqlx::query_as::<_, Habit>(
            r#"
            INSERT INTO habits (name, description, frequency, reminder_time, active_days, created_at)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()))
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.frequency)
        .bind(&new.reminder_time)
        .bind(&new.active_days)
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update_habit(&self, id: i32, changes: HabitUpdate) -> sqlx::Result<Option<Habit>> {
        sqlx::query_as::<_, Habit>(
            r#"
            UPDATE habits SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                frequency = COALESCE($4, frequency),
                reminder_time = COALESCE($5, reminder_time),
                active_days = COALESCE($6, active_days)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.frequency)
        .bind(&changes.reminder_time)
        .bind(&changes.active_days)
        .fetch_optional(&self.pool)
        .await
    }

    /// Completions go with the habit via ON DELETE CASCADE.
    pub async fn delete_habit(&self, id: i32) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM habits WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flip the archived flag. Archiving hides a habit from the default
    /// listing but keeps all of its history; a second call restores it.
    pub async fn toggle_archived(&self, id: i32) -> sqlx::Result<Option<Habit>> {
        sqlx::query_as::<_, Habit>(
            r#"
            UPDATE habits SET is_archived = NOT is_archived
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// All completion records for one habit, newest first.
    pub async fn completions_for_habit(&self, habit_id: i32) -> sqlx::Result<Vec<Completion>> {
        sqlx::query_as::<_, Completion>(
            r#"
            SELECT * FROM habit_completions
            WHERE habit_id = $1
            ORDER BY completion_date DESC
            "#,
        )
        .bind(habit_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn completions_for_date(&self, date: NaiveDate) -> sqlx::Result<Vec<Completion>> {
        sqlx::query_as::<_, Completion>(
            "SELECT * FROM habit_completions WHERE completion_date = $1",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn completions_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> sqlx::Result<Vec<Completion>> {
        sqlx::query_as::<_, Completion>(
            r#"
            SELECT * FROM habit_completions
            WHERE completion_date BETWEEN $1 AND $2
            ORDER BY completion_date DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn completions_in_range_for_habit(
        &self,
        habit_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> sqlx::Result<Vec<Completion>> {
        sqlx::query_as::<_, Completion>(
            r#"
            SELECT * FROM habit_completions
            WHERE habit_id = $1 AND completion_date BETWEEN $2 AND $3
            ORDER BY completion_date ASC
            "#,
        )
        .bind(habit_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
    }

    /// Upsert keyed on `(habit_id, completion_date)`: overwrite the completed
    /// flag if a record exists, insert otherwise. The unique constraint makes
    /// this idempotent; repeating a toggle never duplicates a day, and
    /// concurrent toggles resolve to last-write-wins.
    pub async fn toggle_completion(
        &self,
        habit_id: i32,
        date: NaiveDate,
        completed: bool,
    ) -> sqlx::Result<Completion> {
        sqlx::query_as::<_, Completion>(
            r#"
            INSERT INTO habit_completions (habit_id, completion_date, completed)
            VALUES ($1, $2, $3)
            ON CONFLICT (habit_id, completion_date) DO UPDATE
                SET completed = EXCLUDED.completed
            RETURNING *
            "#,
        )
        .bind(habit_id)
        .bind(date)
        .bind(completed)
        .fetch_one(&self.pool)
        .await
    }

    /// Used by the seeder to decide whether the database is fresh.
    pub async fn count_habits(&self) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM habits")
            .fetch_one(&self.pool)
            .await
    }
}
