use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, Utc};

use crate::dto::{CompletionWindowQuery, HeatmapEntry, HeatmapQuery, ToggleCompletionRequest};
use crate::error::{AppError, AppResult};
use crate::models::completion::Completion;
use crate::AppState;

pub async fn list_habit_completions(
    State(state): State<AppState>,
    Path(habit_id): Path<i32>,
) -> AppResult<Json<Vec<Completion>>> {
    let _habit = state
        .store
        .get_habit(habit_id)
        .await?
        .ok_or(AppError::NotFound("Habit not found".into()))?;

    let completions = state.store.completions_for_habit(habit_id).await?;
    Ok(Json(completions))
}

/// Record a day for a habit: overwrite the completed flag if a record for
/// that date exists, insert one otherwise. Defaults: today, completed.
pub async fn toggle_completion(
    State(state): State<AppState>,
    Path(habit_id): Path<i32>,
    Json(body): Json<ToggleCompletionRequest>,
) -> AppResult<(StatusCode, Json<Completion>)> {
    let _habit = state
        .store
        .get_habit(habit_id)
        .await?
        .ok_or(AppError::NotFound("Habit not found".into()))?;

    let date = body.date.unwrap_or_else(|| Utc::now().date_naive());
    let completed = body.completed.unwrap_or(true);

    let completion = state
        .store
        .toggle_completion(habit_id, date, completed)
        .await?;

    tracing::debug!(habit_id, %date, completed, "Completion toggled");
    Ok((StatusCode::CREATED, Json(completion)))
}

/// GET /api/completions — completions for one date, or for an inclusive
/// date range.
pub async fn list_completions(
    State(state): State<AppState>,
    Query(query): Query<CompletionWindowQuery>,
) -> AppResult<Json<Vec<Completion>>> {
    if let Some(date) = query.date {
        let completions = state.store.completions_for_date(date).await?;
        return Ok(Json(completions));
    }

    match (query.start_date, query.end_date) {
        (Some(start), Some(end)) => {
            let completions = state.store.completions_in_range(start, end).await?;
            Ok(Json(completions))
        }
        _ => Err(AppError::Validation(
            "Please provide either 'date' or both 'startDate' and 'endDate'".into(),
        )),
    }
}

/// Calendar heatmap data: one entry per recorded day in the window, oldest
/// first. Tracked-but-missed days come through with `completed = false`.
pub async fn get_heatmap(
    State(state): State<AppState>,
    Path(habit_id): Path<i32>,
    Query(query): Query<HeatmapQuery>,
) -> AppResult<Json<Vec<HeatmapEntry>>> {
    let _habit = state
        .store
        .get_habit(habit_id)
        .await?
        .ok_or(AppError::NotFound("Habit not found".into()))?;

    let months = query.months.unwrap_or(3).clamp(1, 12);
    let end = Utc::now().date_naive();
    let start = end - Duration::days(months as i64 * 30);

    let completions = state
        .store
        .completions_in_range_for_habit(habit_id, start, end)
        .await?;

    let entries: Vec<HeatmapEntry> = completions
        .into_iter()
        .map(|c| HeatmapEntry {
            date: c.completion_date,
            completed: c.completed,
        })
        .collect();

    Ok(Json(entries))
}
