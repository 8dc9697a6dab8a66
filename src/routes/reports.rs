use crate::commands;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/reports/officers",
            get(commands::reports::get_officer_report),
        )
        .route(
            "/api/reports/officers/export",
            get(commands::reports::export_officer_report),
        )
}
