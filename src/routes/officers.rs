use crate::commands;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/officers/progress",
        get(commands::officers::get_officer_progress),
    )
}
