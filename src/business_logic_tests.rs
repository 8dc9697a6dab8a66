#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    use crate::commands::dashboard::{
        assemble_week, derive_sync_state, metrics_from_counts, RawMetricCounts,
    };
    use crate::commands::officers::{build_officer_progress, OfficerRow, SlotCounts};
    use crate::commands::reports::{
        matches_filter, officer_report_csv, summarize_officers, OfficerFilter, OfficerReportRow,
        OfficerReportSummary,
    };
    use crate::commands::utils::{coordinate_label, officer_initials, percent, target_percent};
    use crate::db::{SyncState, VisitStatus};

    #[test]
    fn test_officer_initials() {
        assert_eq!(officer_initials("Jane Doe"), "JD");
        assert_eq!(officer_initials("Amina"), "A");
        assert_eq!(officer_initials("nakato mary grace"), "NMG");
        assert_eq!(officer_initials(""), "UO");
        assert_eq!(officer_initials("   "), "UO");
    }

    #[test]
    fn test_percent_guards_empty_totals() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(5, 0), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(10, 10), 100);
    }

    #[test]
    fn test_target_percent_caps_overshoot() {
        // 30 completed against a target of 25 renders as 100, not 120.
        assert_eq!(target_percent(30, 25), 100);
        assert_eq!(target_percent(5, 25), 20);
        assert_eq!(target_percent(13, 25), 52);
        assert_eq!(target_percent(0, 25), 0);
        assert_eq!(target_percent(10, 0), 0);
    }

    #[test]
    fn test_coordinate_label_precision() {
        assert_eq!(coordinate_label(0.3476, 32.5825), "0.3476, 32.5825");
        assert_eq!(coordinate_label(1.5, 32.0), "1.5000, 32.0000");
    }

    #[test]
    fn test_metrics_all_zero_on_empty_store() {
        let metrics = metrics_from_counts(RawMetricCounts::default());
        assert_eq!(metrics.today_submissions, 0);
        assert_eq!(metrics.active_field_officers, 0);
        assert_eq!(metrics.data_quality_score, 0);
        assert_eq!(metrics.sync_success_rate, 0);
    }

    #[test]
    fn test_metrics_scores_from_counts() {
        let metrics = metrics_from_counts(RawMetricCounts {
            total_visits: 4,
            geolocated_visits: 3,
            completed_visits: 2,
            ..RawMetricCounts::default()
        });
        assert_eq!(metrics.data_quality_score, 75);
        assert_eq!(metrics.sync_success_rate, 50);
    }

    #[test]
    fn test_week_has_seven_buckets_ending_today() {
        // 2024-03-20 was a Wednesday.
        let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let buckets = assemble_week(today, &HashMap::new(), &HashMap::new());

        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets.last().unwrap().date, today);

        let labels: Vec<&str> = buckets.iter().map(|b| b.day.as_str()).collect();
        assert_eq!(labels, ["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"]);

        for bucket in &buckets {
            assert_eq!(bucket.photos, 0);
            assert_eq!(bucket.videos, 0);
            assert_eq!(bucket.polygons, 0);
            assert_eq!(bucket.reports, 0);
        }
    }

    #[test]
    fn test_week_counts_are_independent() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();

        let mut media = HashMap::new();
        media.insert((monday, "photo".to_string()), 4);
        media.insert((monday, "video".to_string()), 1);

        let mut visits = HashMap::new();
        // A completed visit carrying a polygon lands in both counts.
        visits.insert(monday, (2, 3));

        let buckets = assemble_week(today, &media, &visits);
        let bucket = buckets.iter().find(|b| b.date == monday).unwrap();

        assert_eq!(bucket.day, "Mon");
        assert_eq!(bucket.photos, 4);
        assert_eq!(bucket.videos, 1);
        assert_eq!(bucket.polygons, 2);
        assert_eq!(bucket.reports, 3);
    }

    #[test]
    fn test_sync_state_from_recent_visit() {
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let fresh = now - Duration::hours(2);

        assert_eq!(derive_sync_state(None, now), SyncState::Pending);
        assert_eq!(
            derive_sync_state(Some((fresh, VisitStatus::InProgress)), now),
            SyncState::Pending
        );
        assert_eq!(
            derive_sync_state(Some((fresh, VisitStatus::Completed)), now),
            SyncState::Success
        );
        assert_eq!(
            derive_sync_state(Some((fresh, VisitStatus::Incomplete)), now),
            SyncState::Success
        );
    }

    #[test]
    fn test_sync_staleness_overrides_workflow_status() {
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let stale = now - Duration::hours(25);

        // A completed visit older than the threshold still reports an error.
        assert_eq!(
            derive_sync_state(Some((stale, VisitStatus::Completed)), now),
            SyncState::Error
        );
        assert_eq!(
            derive_sync_state(Some((stale, VisitStatus::InProgress)), now),
            SyncState::Error
        );
    }

    #[test]
    fn test_sync_priority_sorts_errors_first() {
        assert!(SyncState::Error.priority() < SyncState::Pending.priority());
        assert!(SyncState::Pending.priority() < SyncState::Success.priority());
    }

    #[test]
    fn test_visit_status_review_labels() {
        assert_eq!(VisitStatus::Completed.review_label(), "Approved");
        assert_eq!(VisitStatus::Incomplete.review_label(), "Pending Review");
        assert_eq!(VisitStatus::InProgress.review_label(), "In Progress");
    }

    fn officer_row(total_farm_target: Option<i32>, slot_3_target: Option<i32>) -> OfficerRow {
        OfficerRow {
            id: Uuid::new_v4(),
            full_name: "Jane Doe".to_string(),
            uai_code: Some("UAI-001".to_string()),
            region: Some("Central".to_string()),
            sub_county: None,
            supervisor_name: None,
            total_farm_target,
            visit_1_target: None,
            visit_2_target: None,
            visit_3_target: slot_3_target,
            visit_4_target: None,
            visit_5_target: None,
            visit_6_target: None,
            visit_7_target: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_officer_progress_defaults_and_clamping() {
        let mut counts = SlotCounts::default();
        counts.slots[2] = 30;
        counts.total = 30;

        let progress = build_officer_progress(officer_row(None, None), counts);

        assert_eq!(progress.slots.len(), 7);
        let slot_3 = &progress.slots[2];
        assert_eq!(slot_3.visit_number, 3);
        assert_eq!(slot_3.completed, 30);
        assert_eq!(slot_3.target, 25);
        assert_eq!(slot_3.percentage, 100);

        // No target row: the overall target defaults too.
        assert_eq!(progress.total_farm_target, 25);
        assert_eq!(progress.progress_percentage, 100);
        assert_eq!(progress.supervisor_name, "N/A");

        for slot in &progress.slots {
            assert!(slot.percentage <= 100);
        }
    }

    #[test]
    fn test_officer_progress_with_configured_targets() {
        let mut counts = SlotCounts::default();
        counts.slots[2] = 5;
        counts.total = 12;

        let progress = build_officer_progress(officer_row(Some(50), Some(10)), counts);

        assert_eq!(progress.slots[2].target, 10);
        assert_eq!(progress.slots[2].percentage, 50);
        // The other slots fall back to the default target.
        assert_eq!(progress.slots[0].target, 25);
        assert_eq!(progress.progress_percentage, 24);
    }

    #[test]
    fn test_unslotted_visits_count_toward_total_only() {
        let mut counts = SlotCounts::default();
        counts.slots[0] = 2;
        counts.total = 5; // three visits carried no slot number

        let progress = build_officer_progress(officer_row(None, None), counts);

        assert_eq!(progress.total_visits, 5);
        assert_eq!(progress.slots[0].completed, 2);
        let slotted: i64 = progress.slots.iter().map(|s| s.completed).sum();
        assert_eq!(slotted, 2);
        assert_eq!(progress.progress_percentage, 20);
    }

    fn report_row(name: &str, region: Option<&str>, active: bool) -> OfficerReportRow {
        OfficerReportRow {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            uai_code: None,
            phone_number: None,
            region: region.map(str::to_string),
            sub_county: None,
            is_active: active,
            visit_count: 12,
            farmer_count: 4,
            progress_percentage: 48,
            last_visit_at: None,
            joined_at: Utc.with_ymd_and_hms(2024, 2, 1, 8, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_officer_csv_quotes_every_field() {
        let rows = vec![report_row("Jane Doe", None, true)];
        let csv = officer_report_csv(&rows).unwrap();
        let mut lines = csv.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("\"Officer Name\""));

        let row = lines.next().unwrap();
        assert!(row.starts_with("\"Jane Doe\""));
        // Absent UAI code, region and last visit render as the literal fallback.
        assert!(row.contains("\"N/A\""));
        assert!(row.contains("\"Active\""));
        assert!(row.contains("\"48%\""));
        assert!(row.contains("\"2024-02-01\""));

        for field in row.split(',') {
            assert!(field.starts_with('"') && field.ends_with('"'));
        }
    }

    #[test]
    fn test_officer_filter_search_is_case_insensitive() {
        let officer = report_row("Jane Doe", Some("Central"), true);

        let by_name = OfficerFilter {
            search: Some("jane".to_string()),
            ..OfficerFilter::default()
        };
        assert!(matches_filter(&officer, &by_name));

        let by_region = OfficerFilter {
            search: Some("CENTRAL".to_string()),
            ..OfficerFilter::default()
        };
        assert!(matches_filter(&officer, &by_region));

        let no_match = OfficerFilter {
            search: Some("eastern".to_string()),
            ..OfficerFilter::default()
        };
        assert!(!matches_filter(&officer, &no_match));
    }

    #[test]
    fn test_officer_filter_clauses_are_anded() {
        let officer = report_row("Jane Doe", Some("Central"), false);

        let matching = OfficerFilter {
            search: Some("jane".to_string()),
            status: Some("inactive".to_string()),
            region: Some("Central".to_string()),
        };
        assert!(matches_filter(&officer, &matching));

        let wrong_status = OfficerFilter {
            search: Some("jane".to_string()),
            status: Some("active".to_string()),
            region: Some("Central".to_string()),
        };
        assert!(!matches_filter(&officer, &wrong_status));

        let all_values = OfficerFilter {
            status: Some("all".to_string()),
            region: Some("all".to_string()),
            ..OfficerFilter::default()
        };
        assert!(matches_filter(&officer, &all_values));
    }

    #[test]
    fn test_officer_summary_totals() {
        let rows = vec![
            report_row("Jane Doe", Some("Central"), true),
            report_row("John Okello", Some("Eastern"), false),
        ];

        let summary = summarize_officers(&rows);
        assert_eq!(
            summary,
            OfficerReportSummary {
                total_officers: 2,
                active_officers: 1,
                total_visits: 24,
                total_farmers: 8,
            }
        );

        assert_eq!(summarize_officers(&[]), OfficerReportSummary::default());
    }
}
