use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{Pool, Postgres};
use std::str::FromStr;

use crate::error::{FieldsightError, FieldsightResult};

pub type DbPool = Pool<Postgres>;

pub async fn init_pool_with_options(opts: PgConnectOptions) -> FieldsightResult<DbPool> {
    // connect_lazy_with returns the pool immediately. It does not validate connection.
    Ok(PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .idle_timeout(std::time::Duration::from_secs(120))
        .max_lifetime(std::time::Duration::from_secs(300))
        .connect_lazy_with(opts))
}

pub async fn init_pool(database_url: &str) -> FieldsightResult<DbPool> {
    let opts = PgConnectOptions::from_str(database_url)
        .map_err(|e| FieldsightError::Internal(format!("Invalid DB URL: {}", e)))?
        .ssl_mode(PgSslMode::Disable);

    init_pool_with_options(opts).await
}

pub async fn init_database(pool: &DbPool) -> FieldsightResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database ready");
    Ok(())
}

/// Workflow status of a farm visit as recorded by the mobile client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "visit_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    Completed,
    Incomplete,
    InProgress,
}

impl VisitStatus {
    /// Label shown in the review feed. Incomplete visits sit in the review
    /// queue, so they carry the pending label.
    pub fn review_label(self) -> &'static str {
        match self {
            VisitStatus::Completed => "Approved",
            VisitStatus::Incomplete => "Pending Review",
            VisitStatus::InProgress => "In Progress",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "issue_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Open,
    UnderReview,
    Resolved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "issue_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    UncooperativeFarmer,
    InaccessibleArea,
    EquipmentFailure,
    WeatherConditions,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transfer_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    Pending,
    Approved,
    Rejected,
}

/// Derived submission-health state for an officer. This is a UI-level
/// summary, not a literal device sync mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    Success,
    Pending,
    Error,
}

impl SyncState {
    /// Sort rank for the sync feed: errors surface first.
    pub fn priority(self) -> u8 {
        match self {
            SyncState::Error => 0,
            SyncState::Pending => 1,
            SyncState::Success => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SyncState::Success => "Synced",
            SyncState::Pending => "Pending",
            SyncState::Error => "Sync Error",
        }
    }
}

/// Headline numbers for the admin dashboard. Defaults to all zeros so a
/// failed refresh renders as an empty dashboard instead of an error page.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct DashboardMetrics {
    pub today_submissions: i64,
    pub farm_polygons_mapped: i64,
    pub monthly_media_files: i64,
    pub active_field_officers: i64,
    pub pending_reviews: i64,
    pub reports_submitted: i64,
    pub data_quality_score: u8,
    pub sync_success_rate: u8,
}
