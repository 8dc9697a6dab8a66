#[cfg(test)]
mod tests {
    use chrono::Local;
    use uuid::Uuid;

    use crate::commands::dashboard::fetch_dashboard_metrics;
    use crate::commands::officers::fetch_officer_progress;
    use crate::commands::reports::fetch_officer_report;
    use crate::db::{self, DbPool};

    async fn setup_test_db() -> DbPool {
        dotenvy::dotenv().ok();
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = db::init_pool(&database_url)
            .await
            .expect("Failed to create pool");
        db::init_database(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    async fn insert_test_officer(pool: &DbPool, name: &str) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO profiles (full_name, role, region, is_active)
             VALUES ($1, 'field_officer', 'Central', TRUE)
             RETURNING id",
        )
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("Failed to insert officer")
    }

    async fn insert_test_farmer(pool: &DbPool, officer_id: Uuid, name: &str) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO farmers (full_name, gender, phone_number, region, registered_by)
             VALUES ($1, 'female', '0700000000', 'Central', $2)
             RETURNING id",
        )
        .bind(name)
        .bind(officer_id)
        .fetch_one(pool)
        .await
        .expect("Failed to insert farmer")
    }

    async fn cleanup_officer(pool: &DbPool, officer_id: Uuid) {
        let _ = sqlx::query("DELETE FROM farm_visits WHERE field_officer_id = $1")
            .bind(officer_id)
            .execute(pool)
            .await;
        let _ = sqlx::query("DELETE FROM farmers WHERE registered_by = $1")
            .bind(officer_id)
            .execute(pool)
            .await;
        let _ = sqlx::query("DELETE FROM officer_targets WHERE field_officer_id = $1")
            .bind(officer_id)
            .execute(pool)
            .await;
        let _ = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(officer_id)
            .execute(pool)
            .await;
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a live postgres"]
    async fn test_dashboard_metrics_integration() {
        let pool = setup_test_db().await;

        let metrics = fetch_dashboard_metrics(&pool, Local::now().date_naive())
            .await
            .expect("fetch_dashboard_metrics failed");

        assert!(metrics.data_quality_score <= 100);
        assert!(metrics.sync_success_rate <= 100);
        assert!(metrics.today_submissions >= 0);
        assert!(metrics.active_field_officers >= 0);
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a live postgres"]
    async fn test_officer_progress_defaults_integration() {
        let pool = setup_test_db().await;

        let officer_id = insert_test_officer(&pool, "Progress Test Officer").await;
        let farmer_id = insert_test_farmer(&pool, officer_id, "Progress Test Farmer").await;

        // 30 completed slot-3 visits against the default target of 25.
        for _ in 0..30 {
            sqlx::query(
                "INSERT INTO farm_visits (farmer_id, field_officer_id, visit_number, status)
                 VALUES ($1, $2, 3, 'completed')",
            )
            .bind(farmer_id)
            .bind(officer_id)
            .execute(&pool)
            .await
            .expect("Failed to insert visit");
        }

        let progress = fetch_officer_progress(&pool)
            .await
            .expect("fetch_officer_progress failed");

        let officer = progress
            .iter()
            .find(|o| o.id == officer_id)
            .expect("Officer missing from progress view");

        assert_eq!(officer.total_visits, 30);
        assert_eq!(officer.slots[2].completed, 30);
        assert_eq!(officer.slots[2].target, 25);
        assert_eq!(officer.slots[2].percentage, 100);
        assert_eq!(officer.progress_percentage, 100);
        assert_eq!(officer.supervisor_name, "N/A");

        cleanup_officer(&pool, officer_id).await;
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a live postgres"]
    async fn test_officer_report_counts_integration() {
        let pool = setup_test_db().await;

        let officer_id = insert_test_officer(&pool, "Report Test Officer").await;
        let farmer_a = insert_test_farmer(&pool, officer_id, "Report Test Farmer A").await;
        let _farmer_b = insert_test_farmer(&pool, officer_id, "Report Test Farmer B").await;

        for visit_number in 1..=3 {
            sqlx::query(
                "INSERT INTO farm_visits (farmer_id, field_officer_id, visit_number, status)
                 VALUES ($1, $2, $3, 'completed')",
            )
            .bind(farmer_a)
            .bind(officer_id)
            .bind(visit_number)
            .execute(&pool)
            .await
            .expect("Failed to insert visit");
        }

        let report = fetch_officer_report(&pool)
            .await
            .expect("fetch_officer_report failed");

        let officer = report
            .iter()
            .find(|o| o.id == officer_id)
            .expect("Officer missing from report");

        assert_eq!(officer.visit_count, 3);
        assert_eq!(officer.farmer_count, 2);
        assert!(officer.last_visit_at.is_some());
        assert_eq!(officer.progress_percentage, 12);

        cleanup_officer(&pool, officer_id).await;
    }
}
