use axum::{extract::State, Json};
use chrono::Utc;

use crate::dto::DashboardStats;
use crate::error::AppResult;
use crate::services::stats;
use crate::AppState;

/// GET /api/stats — dashboard summary over all non-archived habits.
pub async fn dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    let habits = state.store.list_habits().await?;
    let now = Utc::now();
    let today = now.date_naive();

    let mut with_stats = Vec::with_capacity(habits.len());
    for habit in habits {
        let completions = state.store.completions_for_habit(habit.id).await?;
        with_stats.push(stats::with_stats(habit, &completions, now));
    }

    let today_completions = state.store.completions_for_date(today).await?;

    let total_habits = with_stats.len();
    let completed_today = with_stats.iter().filter(|h| h.is_completed_today).count();
    let max_streak = with_stats.iter().map(|h| h.streak).max().unwrap_or(0);
    let needs_attention = with_stats
        .iter()
        .filter(|h| h.completion_rate < 50.0)
        .count();

    Ok(Json(DashboardStats {
        total_habits,
        completed_today,
        max_streak,
        needs_attention,
        habits: with_stats,
        today_completions,
    }))
}
