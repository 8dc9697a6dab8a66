use crate::state::AppState;
use axum::Router;

pub mod dashboard;
pub mod issues;
pub mod officers;
pub mod reports;
pub mod transfers;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(dashboard::router())
        .merge(officers::router())
        .merge(reports::router())
        .merge(issues::router())
        .merge(transfers::router())
}
