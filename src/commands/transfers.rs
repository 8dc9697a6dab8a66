use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::TransferStatus;
use crate::defaults::ADMIN_LIST_LIMIT;
use crate::error::FieldsightResult;
use crate::state::AppState;

#[derive(Debug, Serialize, FromRow)]
pub struct TransferRequestSummary {
    pub id: Uuid,
    pub preferred_region: String,
    pub reason: String,
    pub status: TransferStatus,
    pub officer_name: String,
    pub approved_by_name: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct TransferListQuery {
    pub status: Option<TransferStatus>,
}

pub async fn get_transfer_requests(
    State(state): State<AppState>,
    Query(query): Query<TransferListQuery>,
) -> FieldsightResult<Json<Vec<TransferRequestSummary>>> {
    let transfers: Vec<TransferRequestSummary> = sqlx::query_as(
        r#"
        SELECT t.id, t.preferred_region, t.reason, t.status,
               p.full_name AS officer_name,
               a.full_name AS approved_by_name,
               t.approved_at, t.created_at
        FROM transfer_requests t
        JOIN profiles p ON t.field_officer_id = p.id
        LEFT JOIN profiles a ON t.approved_by = a.id
        WHERE ($1::transfer_status IS NULL OR t.status = $1)
        ORDER BY t.created_at DESC
        LIMIT $2
        "#,
    )
    .bind(query.status)
    .bind(ADMIN_LIST_LIMIT)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(transfers))
}
