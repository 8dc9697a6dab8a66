use std::collections::HashMap;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::commands::utils::target_percent;
use crate::db::DbPool;
use crate::defaults::{DEFAULT_TOTAL_FARM_TARGET, DEFAULT_VISIT_TARGET, NOT_AVAILABLE};
use crate::error::FieldsightResult;
use crate::state::AppState;

#[derive(Debug, FromRow)]
pub(crate) struct OfficerRow {
    pub(crate) id: Uuid,
    pub(crate) full_name: String,
    pub(crate) uai_code: Option<String>,
    pub(crate) region: Option<String>,
    pub(crate) sub_county: Option<String>,
    pub(crate) supervisor_name: Option<String>,
    pub(crate) total_farm_target: Option<i32>,
    pub(crate) visit_1_target: Option<i32>,
    pub(crate) visit_2_target: Option<i32>,
    pub(crate) visit_3_target: Option<i32>,
    pub(crate) visit_4_target: Option<i32>,
    pub(crate) visit_5_target: Option<i32>,
    pub(crate) visit_6_target: Option<i32>,
    pub(crate) visit_7_target: Option<i32>,
    pub(crate) created_at: DateTime<Utc>,
}

impl OfficerRow {
    fn slot_targets(&self) -> [Option<i32>; 7] {
        [
            self.visit_1_target,
            self.visit_2_target,
            self.visit_3_target,
            self.visit_4_target,
            self.visit_5_target,
            self.visit_6_target,
            self.visit_7_target,
        ]
    }
}

/// Visit tallies for one officer. Visits without a slot number count toward
/// the total but toward no individual slot.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SlotCounts {
    pub(crate) slots: [i64; 7],
    pub(crate) total: i64,
}

#[derive(Debug, Serialize)]
pub struct VisitSlotProgress {
    pub visit_number: u8,
    pub completed: i64,
    pub target: i32,
    pub percentage: u8,
}

#[derive(Debug, Serialize)]
pub struct OfficerProgress {
    pub id: Uuid,
    pub full_name: String,
    pub uai_code: Option<String>,
    pub region: Option<String>,
    pub sub_county: Option<String>,
    pub supervisor_name: String,
    pub total_farm_target: i32,
    pub total_visits: i64,
    pub progress_percentage: u8,
    pub slots: Vec<VisitSlotProgress>,
    pub joined_at: DateTime<Utc>,
}

pub async fn get_officer_progress(
    State(state): State<AppState>,
) -> FieldsightResult<Json<Vec<OfficerProgress>>> {
    match fetch_officer_progress(&state.pool).await {
        Ok(officers) => Ok(Json(officers)),
        Err(e) => {
            tracing::error!("Officer progress query failed: {:?}", e);
            Ok(Json(Vec::new()))
        }
    }
}

pub(crate) async fn fetch_officer_progress(
    pool: &DbPool,
) -> FieldsightResult<Vec<OfficerProgress>> {
    let officers: Vec<OfficerRow> = sqlx::query_as(
        r#"
        SELECT p.id, p.full_name, p.uai_code, p.region, p.sub_county,
               s.full_name AS supervisor_name,
               t.total_farm_target,
               t.visit_1_target, t.visit_2_target, t.visit_3_target,
               t.visit_4_target, t.visit_5_target, t.visit_6_target,
               t.visit_7_target,
               p.created_at
        FROM profiles p
        LEFT JOIN profiles s ON p.assigned_supervisor_id = s.id
        LEFT JOIN officer_targets t ON t.field_officer_id = p.id
        WHERE p.role = 'field_officer'
        ORDER BY p.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let count_rows: Vec<(Uuid, Option<i32>, i64)> = sqlx::query_as(
        r#"
        SELECT field_officer_id, visit_number, COUNT(*) AS n
        FROM farm_visits
        GROUP BY 1, 2
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut counts: HashMap<Uuid, SlotCounts> = HashMap::new();
    for (officer_id, visit_number, n) in count_rows {
        let entry = counts.entry(officer_id).or_default();
        entry.total += n;
        if let Some(slot) = visit_number {
            if (1..=7).contains(&slot) {
                entry.slots[(slot - 1) as usize] += n;
            }
        }
    }

    Ok(officers
        .into_iter()
        .map(|row| {
            let officer_counts = counts.get(&row.id).copied().unwrap_or_default();
            build_officer_progress(row, officer_counts)
        })
        .collect())
}

pub(crate) fn build_officer_progress(row: OfficerRow, counts: SlotCounts) -> OfficerProgress {
    let slots = row
        .slot_targets()
        .iter()
        .enumerate()
        .map(|(i, slot_target)| {
            let target = slot_target.unwrap_or(DEFAULT_VISIT_TARGET);
            let completed = counts.slots[i];
            VisitSlotProgress {
                visit_number: (i + 1) as u8,
                completed,
                target,
                percentage: target_percent(completed, target),
            }
        })
        .collect();

    let total_farm_target = row.total_farm_target.unwrap_or(DEFAULT_TOTAL_FARM_TARGET);

    OfficerProgress {
        id: row.id,
        full_name: row.full_name,
        uai_code: row.uai_code,
        region: row.region,
        sub_county: row.sub_county,
        supervisor_name: row
            .supervisor_name
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        total_farm_target,
        total_visits: counts.total,
        progress_percentage: target_percent(counts.total, total_farm_target),
        slots,
        joined_at: row.created_at,
    }
}
