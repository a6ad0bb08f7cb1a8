use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::dto::{CreateHabitRequest, UpdateHabitRequest};
use crate::error::{AppError, AppResult};
use crate::models::habit::{Habit, HabitUpdate, HabitWithStats, NewHabit};
use crate::services::stats;
use crate::AppState;

/// Default weekday schedule, matching the habits table column default.
const DEFAULT_ACTIVE_DAYS_JSON: &str = "[1,2,3,4,5]";

pub async fn list_habits(State(state): State<AppState>) -> AppResult<Json<Vec<HabitWithStats>>> {
    let habits = state.store.list_habits().await?;
    let now = Utc::now();

    let mut result = Vec::with_capacity(habits.len());
    for habit in habits {
        let completions = state.store.completions_for_habit(habit.id).await?;
        result.push(stats::with_stats(habit, &completions, now));
    }

    Ok(Json(result))
}

pub async fn get_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<i32>,
) -> AppResult<Json<HabitWithStats>> {
    let habit = state
        .store
        .get_habit(habit_id)
        .await?
        .ok_or(AppError::NotFound("Habit not found".into()))?;

    let completions = state.store.completions_for_habit(habit.id).await?;
    Ok(Json(stats::with_stats(habit, &completions, Utc::now())))
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(body): Json<CreateHabitRequest>,
) -> AppResult<(StatusCode, Json<Habit>)> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let active_days = match body.active_days.clone() {
        Some(input) => input.into_stored().map_err(AppError::Validation)?,
        None => DEFAULT_ACTIVE_DAYS_JSON.to_string(),
    };

    let habit = state
        .store
        .create_habit(NewHabit {
            name: body.name.clone(),
            description: body.description.clone(),
            frequency: body.frequency.unwrap_or_default(),
            reminder_time: body.normalized_reminder(),
            active_days,
            created_at: None,
        })
        .await?;

    tracing::info!(habit_id = habit.id, name = %habit.name, "Habit created");
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn update_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<i32>,
    Json(body): Json<UpdateHabitRequest>,
) -> AppResult<Json<Habit>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let active_days = match body.active_days {
        Some(input) => Some(input.into_stored().map_err(AppError::Validation)?),
        None => None,
    };

    let habit = state
        .store
        .update_habit(
            habit_id,
            HabitUpdate {
                name: body.name,
                description: body.description,
                frequency: body.frequency,
                reminder_time: body.reminder_time,
                active_days,
            },
        )
        .await?
        .ok_or(AppError::NotFound("Habit not found".into()))?;

    Ok(Json(habit))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<i32>,
) -> AppResult<StatusCode> {
    let deleted = state.store.delete_habit(habit_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Habit not found".into()));
    }

    tracing::info!(habit_id, "Habit deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle the archived flag: archived habits drop out of the default listing
/// but keep their completion history, and a second call restores them.
pub async fn archive_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<i32>,
) -> AppResult<Json<Habit>> {
    let habit = state
        .store
        .toggle_archived(habit_id)
        .await?
        .ok_or(AppError::NotFound("Habit not found".into()))?;

    tracing::info!(
        habit_id,
        archived = habit.is_archived,
        "Habit archive state toggled"
    );
    Ok(Json(habit))
}
