use crate::commands;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/transfers",
        get(commands::transfers::get_transfer_requests),
    )
}
