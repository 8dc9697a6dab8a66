use std::collections::HashMap;

use axum::{extract::State, Json};
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::commands::utils::{coordinate_label, officer_initials, percent};
use crate::db::{DashboardMetrics, DbPool, SyncState, VisitStatus};
use crate::defaults::{
    ACTIVE_OFFICER_WINDOW_DAYS, GEOGRAPHIC_FEED_LIMIT, METRICS_QUERY_TIMEOUT_SECS,
    RECENT_ACTIVITY_LIMIT, STALE_SYNC_HOURS, SYNC_STATUS_LIMIT, UNKNOWN_OFFICER, UNKNOWN_REGION,
};
use crate::error::FieldsightResult;
use crate::state::AppState;

#[derive(Debug, Default, FromRow)]
pub(crate) struct RawMetricCounts {
    pub(crate) today_submissions: i64,
    pub(crate) farm_polygons_mapped: i64,
    pub(crate) monthly_media_files: i64,
    pub(crate) active_field_officers: i64,
    pub(crate) pending_reviews: i64,
    pub(crate) reports_submitted: i64,
    pub(crate) total_visits: i64,
    pub(crate) geolocated_visits: i64,
    pub(crate) completed_visits: i64,
}

pub async fn get_dashboard_metrics(
    State(state): State<AppState>,
) -> FieldsightResult<Json<DashboardMetrics>> {
    let today = Local::now().date_naive();

    match tokio::time::timeout(
        std::time::Duration::from_secs(METRICS_QUERY_TIMEOUT_SECS),
        fetch_dashboard_metrics(&state.pool, today),
    )
    .await
    {
        Ok(Ok(metrics)) => Ok(Json(metrics)),
        Ok(Err(e)) => {
            tracing::error!("Dashboard metrics query failed: {:?}", e);
            Ok(Json(DashboardMetrics::default()))
        }
        Err(_) => {
            tracing::error!("Dashboard metrics query timed out");
            Ok(Json(DashboardMetrics::default()))
        }
    }
}

pub(crate) async fn fetch_dashboard_metrics(
    pool: &DbPool,
    today: NaiveDate,
) -> FieldsightResult<DashboardMetrics> {
    let active_cutoff = Utc::now() - Duration::days(ACTIVE_OFFICER_WINDOW_DAYS);

    let sql = r#"
        SELECT
            (SELECT COUNT(*) FROM farm_visits
             WHERE created_at >= $1::timestamp
               AND created_at < $1::timestamp + interval '1 day') AS today_submissions,
            (SELECT COUNT(*) FROM farm_visits
             WHERE polygon_boundaries IS NOT NULL) AS farm_polygons_mapped,
            (SELECT COUNT(*) FROM visit_media
             WHERE created_at >= date_trunc('month', $1::timestamp)) AS monthly_media_files,
            (SELECT COUNT(DISTINCT field_officer_id) FROM farm_visits
             WHERE created_at >= $2) AS active_field_officers,
            (SELECT COUNT(*) FROM issues WHERE status = 'open') AS pending_reviews,
            (SELECT COUNT(*) FROM farm_visits
             WHERE status = 'completed'
               AND created_at >= date_trunc('month', $1::timestamp)) AS reports_submitted,
            (SELECT COUNT(*) FROM farm_visits) AS total_visits,
            (SELECT COUNT(*) FROM farm_visits
             WHERE gps_latitude IS NOT NULL AND gps_longitude IS NOT NULL) AS geolocated_visits,
            (SELECT COUNT(*) FROM farm_visits WHERE status = 'completed') AS completed_visits
    "#;

    let counts = sqlx::query_as::<_, RawMetricCounts>(sql)
        .bind(today)
        .bind(active_cutoff)
        .fetch_one(pool)
        .await?;

    Ok(metrics_from_counts(counts))
}

pub(crate) fn metrics_from_counts(counts: RawMetricCounts) -> DashboardMetrics {
    DashboardMetrics {
        today_submissions: counts.today_submissions,
        farm_polygons_mapped: counts.farm_polygons_mapped,
        monthly_media_files: counts.monthly_media_files,
        active_field_officers: counts.active_field_officers,
        pending_reviews: counts.pending_reviews,
        reports_submitted: counts.reports_submitted,
        data_quality_score: percent(counts.geolocated_visits, counts.total_visits),
        sync_success_rate: percent(counts.completed_visits, counts.total_visits),
    }
}

/// One day of collection activity. The four counts overlap (a completed
/// visit with a polygon lands in both columns), they are not a partition.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyActivity {
    pub day: String,
    pub date: NaiveDate,
    pub photos: i64,
    pub videos: i64,
    pub polygons: i64,
    pub reports: i64,
}

pub async fn get_weekly_trends(
    State(state): State<AppState>,
) -> FieldsightResult<Json<Vec<WeeklyActivity>>> {
    let today = Local::now().date_naive();

    match fetch_weekly_trends(&state.pool, today).await {
        Ok(buckets) => Ok(Json(buckets)),
        Err(e) => {
            tracing::error!("Weekly trends query failed: {:?}", e);
            Ok(Json(Vec::new()))
        }
    }
}

pub(crate) async fn fetch_weekly_trends(
    pool: &DbPool,
    today: NaiveDate,
) -> FieldsightResult<Vec<WeeklyActivity>> {
    let start = today - Duration::days(6);

    let media_rows: Vec<(NaiveDate, String, i64)> = sqlx::query_as(
        r#"
        SELECT created_at::date AS day, media_type, COUNT(*) AS n
        FROM visit_media
        WHERE created_at >= $1::timestamp
          AND created_at < $1::timestamp + interval '7 days'
        GROUP BY 1, 2
        "#,
    )
    .bind(start)
    .fetch_all(pool)
    .await?;

    let visit_rows: Vec<(NaiveDate, i64, i64)> = sqlx::query_as(
        r#"
        SELECT created_at::date AS day,
               COUNT(*) FILTER (WHERE polygon_boundaries IS NOT NULL) AS polygons,
               COUNT(*) FILTER (WHERE status = 'completed') AS reports
        FROM farm_visits
        WHERE created_at >= $1::timestamp
          AND created_at < $1::timestamp + interval '7 days'
        GROUP BY 1
        "#,
    )
    .bind(start)
    .fetch_all(pool)
    .await?;

    let mut media = HashMap::new();
    for (day, media_type, n) in media_rows {
        media.insert((day, media_type), n);
    }

    let mut visits = HashMap::new();
    for (day, polygons, reports) in visit_rows {
        visits.insert(day, (polygons, reports));
    }

    Ok(assemble_week(today, &media, &visits))
}

/// Builds the seven trailing-day buckets ending on `today`, in
/// chronological order, labeled with each date's weekday abbreviation.
pub(crate) fn assemble_week(
    today: NaiveDate,
    media: &HashMap<(NaiveDate, String), i64>,
    visits: &HashMap<NaiveDate, (i64, i64)>,
) -> Vec<WeeklyActivity> {
    (0..7)
        .map(|i| {
            let date = today - Duration::days(6 - i);
            let (polygons, reports) = visits.get(&date).copied().unwrap_or((0, 0));
            WeeklyActivity {
                day: date.format("%a").to_string(),
                date,
                photos: media
                    .get(&(date, "photo".to_string()))
                    .copied()
                    .unwrap_or(0),
                videos: media
                    .get(&(date, "video".to_string()))
                    .copied()
                    .unwrap_or(0),
                polygons,
                reports,
            }
        })
        .collect()
}

#[derive(Debug, FromRow)]
struct ActivityRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    status: VisitStatus,
    visit_notes: Option<String>,
    officer_name: Option<String>,
    region: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActivityItem {
    pub id: Uuid,
    pub officer_name: String,
    pub officer_initials: String,
    pub region: String,
    pub submission_type: String,
    pub timestamp: DateTime<Utc>,
    pub status: VisitStatus,
    pub status_label: String,
}

pub async fn get_recent_activity(
    State(state): State<AppState>,
) -> FieldsightResult<Json<Vec<ActivityItem>>> {
    match fetch_recent_activity(&state.pool).await {
        Ok(items) => Ok(Json(items)),
        Err(e) => {
            tracing::error!("Recent activity query failed: {:?}", e);
            Ok(Json(Vec::new()))
        }
    }
}

pub(crate) async fn fetch_recent_activity(pool: &DbPool) -> FieldsightResult<Vec<ActivityItem>> {
    let rows: Vec<ActivityRow> = sqlx::query_as(
        r#"
        SELECT v.id, v.created_at, v.status, v.visit_notes,
               p.full_name AS officer_name, p.region
        FROM farm_visits v
        LEFT JOIN profiles p ON v.field_officer_id = p.id
        ORDER BY v.created_at DESC
        LIMIT $1
        "#,
    )
    .bind(RECENT_ACTIVITY_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let officer_name = row.officer_name.unwrap_or_else(|| UNKNOWN_OFFICER.to_string());
            ActivityItem {
                id: row.id,
                officer_initials: officer_initials(&officer_name),
                officer_name,
                region: row.region.unwrap_or_else(|| UNKNOWN_REGION.to_string()),
                submission_type: if row.visit_notes.is_some() {
                    "Farm Report".to_string()
                } else {
                    "Farm Visit".to_string()
                },
                timestamp: row.created_at,
                status: row.status,
                status_label: row.status.review_label().to_string(),
            }
        })
        .collect())
}

#[derive(Debug, FromRow)]
struct SyncRow {
    officer_id: Uuid,
    officer_name: String,
    last_visit_at: Option<DateTime<Utc>>,
    last_visit_status: Option<VisitStatus>,
    total_submissions: i64,
}

#[derive(Debug, Serialize)]
pub struct SyncStatusEntry {
    pub officer_id: Uuid,
    pub officer_name: String,
    pub status: SyncState,
    pub status_label: String,
    pub last_sync: DateTime<Utc>,
    pub total_submissions: i64,
}

pub async fn get_sync_status(
    State(state): State<AppState>,
) -> FieldsightResult<Json<Vec<SyncStatusEntry>>> {
    match fetch_sync_status(&state.pool, Utc::now()).await {
        Ok(entries) => Ok(Json(entries)),
        Err(e) => {
            tracing::error!("Sync status query failed: {:?}", e);
            Ok(Json(Vec::new()))
        }
    }
}

pub(crate) async fn fetch_sync_status(
    pool: &DbPool,
    now: DateTime<Utc>,
) -> FieldsightResult<Vec<SyncStatusEntry>> {
    let rows: Vec<SyncRow> = sqlx::query_as(
        r#"
        SELECT p.id AS officer_id, p.full_name AS officer_name,
               last.created_at AS last_visit_at, last.status AS last_visit_status,
               COALESCE(cnt.total, 0) AS total_submissions
        FROM profiles p
        LEFT JOIN LATERAL (
            SELECT created_at, status FROM farm_visits
            WHERE field_officer_id = p.id
            ORDER BY created_at DESC
            LIMIT 1
        ) last ON TRUE
        LEFT JOIN (
            SELECT field_officer_id, COUNT(*) AS total FROM farm_visits GROUP BY 1
        ) cnt ON cnt.field_officer_id = p.id
        WHERE p.role = 'field_officer' AND p.is_active = TRUE
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut entries: Vec<SyncStatusEntry> = rows
        .into_iter()
        .map(|row| {
            let last_visit = row.last_visit_at.zip(row.last_visit_status);
            let status = derive_sync_state(last_visit, now);
            SyncStatusEntry {
                officer_id: row.officer_id,
                officer_name: row.officer_name,
                status,
                status_label: status.label().to_string(),
                last_sync: row.last_visit_at.unwrap_or(now),
                total_submissions: row.total_submissions,
            }
        })
        .collect();

    entries.sort_by_key(|entry| entry.status.priority());
    entries.truncate(SYNC_STATUS_LIMIT);

    Ok(entries)
}

/// Collapses an officer's most recent visit into the tri-state feed value.
/// Staleness wins over workflow status: anything older than the threshold
/// reports as an error even when the visit itself completed.
pub(crate) fn derive_sync_state(
    last_visit: Option<(DateTime<Utc>, VisitStatus)>,
    now: DateTime<Utc>,
) -> SyncState {
    if let Some((synced_at, _)) = last_visit {
        if now - synced_at > Duration::hours(STALE_SYNC_HOURS) {
            return SyncState::Error;
        }
    }

    match last_visit {
        None | Some((_, VisitStatus::InProgress)) => SyncState::Pending,
        Some(_) => SyncState::Success,
    }
}

#[derive(Debug, FromRow)]
struct GeoRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    gps_latitude: f64,
    gps_longitude: f64,
    has_polygon: bool,
    officer_name: Option<String>,
    region: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize)]
pub struct GeographicSubmission {
    pub id: Uuid,
    pub region: String,
    pub coordinates: Coordinates,
    pub coordinates_label: String,
    pub officer_name: String,
    pub submission_type: String,
    pub timestamp: DateTime<Utc>,
}

pub async fn get_geographic_overview(
    State(state): State<AppState>,
) -> FieldsightResult<Json<Vec<GeographicSubmission>>> {
    match fetch_geographic_overview(&state.pool).await {
        Ok(submissions) => Ok(Json(submissions)),
        Err(e) => {
            tracing::error!("Geographic overview query failed: {:?}", e);
            Ok(Json(Vec::new()))
        }
    }
}

pub(crate) async fn fetch_geographic_overview(
    pool: &DbPool,
) -> FieldsightResult<Vec<GeographicSubmission>> {
    let rows: Vec<GeoRow> = sqlx::query_as(
        r#"
        SELECT v.id, v.created_at, v.gps_latitude, v.gps_longitude,
               v.polygon_boundaries IS NOT NULL AS has_polygon,
               p.full_name AS officer_name, p.region
        FROM farm_visits v
        LEFT JOIN profiles p ON v.field_officer_id = p.id
        WHERE v.gps_latitude IS NOT NULL AND v.gps_longitude IS NOT NULL
        ORDER BY v.created_at DESC
        LIMIT $1
        "#,
    )
    .bind(GEOGRAPHIC_FEED_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| GeographicSubmission {
            id: row.id,
            region: row.region.unwrap_or_else(|| UNKNOWN_REGION.to_string()),
            coordinates_label: coordinate_label(row.gps_latitude, row.gps_longitude),
            coordinates: Coordinates {
                lat: row.gps_latitude,
                lng: row.gps_longitude,
            },
            officer_name: row.officer_name.unwrap_or_else(|| UNKNOWN_OFFICER.to_string()),
            submission_type: if row.has_polygon {
                "Farm Polygon".to_string()
            } else {
                "GPS Point".to_string()
            },
            timestamp: row.created_at,
        })
        .collect())
}
