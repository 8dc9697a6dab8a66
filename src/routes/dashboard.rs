use crate::commands;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/dashboard/metrics",
            get(commands::dashboard::get_dashboard_metrics),
        )
        .route(
            "/api/dashboard/weekly-trends",
            get(commands::dashboard::get_weekly_trends),
        )
        .route(
            "/api/dashboard/recent-activity",
            get(commands::dashboard::get_recent_activity),
        )
        .route(
            "/api/dashboard/sync-status",
            get(commands::dashboard::get_sync_status),
        )
        .route(
            "/api/dashboard/geographic",
            get(commands::dashboard::get_geographic_overview),
        )
}
