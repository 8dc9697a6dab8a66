use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::commands::utils::target_percent;
use crate::db::DbPool;
use crate::defaults::{DEFAULT_TOTAL_FARM_TARGET, NOT_AVAILABLE};
use crate::error::{FieldsightError, FieldsightResult};
use crate::state::AppState;

const CSV_HEADER: [&str; 11] = [
    "Officer Name",
    "UAI Code",
    "Phone",
    "Region",
    "Sub County",
    "Status",
    "Farm Visits",
    "Farmers Registered",
    "Progress",
    "Last Visit",
    "Joined",
];

#[derive(Debug, FromRow)]
struct OfficerReportRecord {
    id: Uuid,
    full_name: String,
    uai_code: Option<String>,
    phone_number: Option<String>,
    region: Option<String>,
    sub_county: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    visit_count: i64,
    farmer_count: i64,
    last_visit_at: Option<DateTime<Utc>>,
    total_farm_target: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct OfficerReportRow {
    pub id: Uuid,
    pub full_name: String,
    pub uai_code: Option<String>,
    pub phone_number: Option<String>,
    pub region: Option<String>,
    pub sub_county: Option<String>,
    pub is_active: bool,
    pub visit_count: i64,
    pub farmer_count: i64,
    pub progress_percentage: u8,
    pub last_visit_at: Option<DateTime<Utc>>,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Default, PartialEq, Eq)]
pub struct OfficerReportSummary {
    pub total_officers: i64,
    pub active_officers: i64,
    pub total_visits: i64,
    pub total_farmers: i64,
}

#[derive(Debug, Serialize)]
pub struct OfficerReport {
    pub officers: Vec<OfficerReportRow>,
    pub summary: OfficerReportSummary,
}

/// Search/filter parameters for the officer roster. Filtering always runs
/// over the full fetched roster, mirroring the in-memory table filter.
#[derive(Debug, Default, Deserialize)]
pub struct OfficerFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    pub region: Option<String>,
}

pub async fn get_officer_report(
    State(state): State<AppState>,
) -> FieldsightResult<Json<OfficerReport>> {
    match fetch_officer_report(&state.pool).await {
        Ok(officers) => {
            let summary = summarize_officers(&officers);
            Ok(Json(OfficerReport { officers, summary }))
        }
        Err(e) => {
            tracing::error!("Officer report query failed: {:?}", e);
            Ok(Json(OfficerReport {
                officers: Vec::new(),
                summary: OfficerReportSummary::default(),
            }))
        }
    }
}

pub async fn export_officer_report(
    State(state): State<AppState>,
    Query(filter): Query<OfficerFilter>,
) -> FieldsightResult<Response> {
    let officers = fetch_officer_report(&state.pool).await?;
    let filtered: Vec<OfficerReportRow> = officers
        .into_iter()
        .filter(|officer| matches_filter(officer, &filter))
        .collect();

    let body = officer_report_csv(&filtered)?;
    let filename = format!("field-officers-{}.csv", Local::now().date_naive());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}

pub(crate) async fn fetch_officer_report(
    pool: &DbPool,
) -> FieldsightResult<Vec<OfficerReportRow>> {
    let records: Vec<OfficerReportRecord> = sqlx::query_as(
        r#"
        SELECT p.id, p.full_name, p.uai_code, p.phone_number, p.region,
               p.sub_county, p.is_active, p.created_at,
               COALESCE(v.visit_count, 0) AS visit_count,
               COALESCE(f.farmer_count, 0) AS farmer_count,
               v.last_visit_at,
               t.total_farm_target
        FROM profiles p
        LEFT JOIN (
            SELECT field_officer_id, COUNT(*) AS visit_count,
                   MAX(created_at) AS last_visit_at
            FROM farm_visits
            GROUP BY 1
        ) v ON v.field_officer_id = p.id
        LEFT JOIN (
            SELECT registered_by, COUNT(*) AS farmer_count
            FROM farmers
            GROUP BY 1
        ) f ON f.registered_by = p.id
        LEFT JOIN officer_targets t ON t.field_officer_id = p.id
        WHERE p.role = 'field_officer'
        ORDER BY p.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(records
        .into_iter()
        .map(|record| {
            let target = record
                .total_farm_target
                .unwrap_or(DEFAULT_TOTAL_FARM_TARGET);
            OfficerReportRow {
                id: record.id,
                full_name: record.full_name,
                uai_code: record.uai_code,
                phone_number: record.phone_number,
                region: record.region,
                sub_county: record.sub_county,
                is_active: record.is_active,
                visit_count: record.visit_count,
                farmer_count: record.farmer_count,
                progress_percentage: target_percent(record.visit_count, target),
                last_visit_at: record.last_visit_at,
                joined_at: record.created_at,
            }
        })
        .collect())
}

pub(crate) fn summarize_officers(officers: &[OfficerReportRow]) -> OfficerReportSummary {
    OfficerReportSummary {
        total_officers: officers.len() as i64,
        active_officers: officers.iter().filter(|o| o.is_active).count() as i64,
        total_visits: officers.iter().map(|o| o.visit_count).sum(),
        total_farmers: officers.iter().map(|o| o.farmer_count).sum(),
    }
}

/// Case-insensitive substring search over name, region and UAI code, ANDed
/// with the active/inactive and region equality filters.
pub(crate) fn matches_filter(officer: &OfficerReportRow, filter: &OfficerFilter) -> bool {
    let matches_search = match filter.search.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(term) => {
            let term = term.to_lowercase();
            officer.full_name.to_lowercase().contains(&term)
                || officer
                    .region
                    .as_deref()
                    .is_some_and(|region| region.to_lowercase().contains(&term))
                || officer
                    .uai_code
                    .as_deref()
                    .is_some_and(|code| code.to_lowercase().contains(&term))
        }
    };

    let matches_status = match filter.status.as_deref() {
        Some("active") => officer.is_active,
        Some("inactive") => !officer.is_active,
        _ => true,
    };

    let matches_region = match filter.region.as_deref() {
        None | Some("all") => true,
        Some(region) => officer.region.as_deref() == Some(region),
    };

    matches_search && matches_status && matches_region
}

pub(crate) fn officer_report_csv(officers: &[OfficerReportRow]) -> FieldsightResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for officer in officers {
        writer.write_record([
            officer.full_name.clone(),
            text_or_na(officer.uai_code.as_deref()),
            text_or_na(officer.phone_number.as_deref()),
            text_or_na(officer.region.as_deref()),
            text_or_na(officer.sub_county.as_deref()),
            if officer.is_active { "Active" } else { "Inactive" }.to_string(),
            officer.visit_count.to_string(),
            officer.farmer_count.to_string(),
            format!("{}%", officer.progress_percentage),
            officer
                .last_visit_at
                .map(|at| at.date_naive().to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            officer.joined_at.date_naive().to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| FieldsightError::Internal(format!("Finalizing CSV export failed: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|e| FieldsightError::Internal(format!("CSV export was not valid UTF-8: {}", e)))
}

fn text_or_na(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}
