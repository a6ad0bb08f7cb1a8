pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use config::Config;
use db::HabitStore;

#[derive(Clone)]
pub struct AppState {
    pub store: HabitStore,
    pub config: Arc<Config>,
}

pub fn router(state: AppState) -> Router {
    let allowed_origins: Vec<axum::http::HeaderValue> = {
        let mut origins = vec![state
            .config
            .frontend_url
            .parse::<axum::http::HeaderValue>()
            .unwrap()];
        // In dev, also allow LAN access (e.g. testing from another device)
        if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
            for o in extra.split(',') {
                if let Ok(hv) = o.trim().parse::<axum::http::HeaderValue>() {
                    origins.push(hv);
                }
            }
        }
        origins
    };
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ]);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        // Habits
        .route(
            "/api/habits",
            get(handlers::habits::list_habits).post(handlers::habits::create_habit),
        )
        .route(
            "/api/habits/:id",
            get(handlers::habits::get_habit)
                .patch(handlers::habits::update_habit)
                .delete(handlers::habits::delete_habit),
        )
        .route(
            "/api/habits/:id/archive",
            patch(handlers::habits::archive_habit),
        )
        // Completions
        .route(
            "/api/habits/:id/completions",
            get(handlers::completions::list_habit_completions)
                .post(handlers::completions::toggle_completion),
        )
        .route(
            "/api/habits/:id/heatmap",
            get(handlers::completions::get_heatmap),
        )
        .route(
            "/api/completions",
            get(handlers::completions::list_completions),
        )
        // Dashboard
        .route("/api/stats", get(handlers::stats::dashboard))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
