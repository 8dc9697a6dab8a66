use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{IssueStatus, IssueType};
use crate::defaults::ADMIN_LIST_LIMIT;
use crate::error::FieldsightResult;
use crate::state::AppState;

#[derive(Debug, Serialize, FromRow)]
pub struct IssueSummary {
    pub id: Uuid,
    pub issue_type: IssueType,
    pub description: String,
    pub status: IssueStatus,
    pub officer_name: String,
    pub resolved_by_name: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct IssueListQuery {
    pub status: Option<IssueStatus>,
}

pub async fn get_issues(
    State(state): State<AppState>,
    Query(query): Query<IssueListQuery>,
) -> FieldsightResult<Json<Vec<IssueSummary>>> {
    let issues: Vec<IssueSummary> = sqlx::query_as(
        r#"
        SELECT i.id, i.issue_type, i.description, i.status,
               p.full_name AS officer_name,
               r.full_name AS resolved_by_name,
               i.resolved_at, i.created_at
        FROM issues i
        JOIN profiles p ON i.field_officer_id = p.id
        LEFT JOIN profiles r ON i.resolved_by = r.id
        WHERE ($1::issue_status IS NULL OR i.status = $1)
        ORDER BY i.created_at DESC
        LIMIT $2
        "#,
    )
    .bind(query.status)
    .bind(ADMIN_LIST_LIMIT)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(issues))
}
