use sqlx::PgPool;
use tracing::debug;

use crate::core::error::{db_error, Result};
use crate::features::dashboard::dtos::{DashboardStatsDto, UpcomingVisitDto, UrgentPrescriptionDto};
use crate::features::dashboard::models::{DashboardCounts, UpcomingVisitRow, UrgentPrescriptionRow};
use crate::shared::constants::{UPCOMING_VISITS_LIMIT, URGENT_PRESCRIPTIONS_LIMIT};

/// Read-only queries behind the home page
pub struct DashboardService {
    pool: PgPool,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn stats(&self) -> Result<DashboardStatsDto> {
        let counts = sqlx::query_as::<_, DashboardCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM establishments) AS establishments,
                (SELECT COUNT(*) FROM visits WHERE scheduled_date >= NOW()) AS upcoming_visits,
                (SELECT COUNT(*) FROM commission_prescriptions WHERE status = 'to_correct')
                    AS prescriptions_to_correct,
                (SELECT COUNT(*) FROM regulatory_files WHERE status = 'in_progress')
                    AS regulatory_files_in_progress
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to get dashboard counts"))?;

        debug!("Dashboard counts: {:?}", counts);
        Ok(counts.into())
    }

    /// The next visits from now, soonest first
    pub async fn upcoming_visits(&self) -> Result<Vec<UpcomingVisitDto>> {
        let rows = sqlx::query_as::<_, UpcomingVisitRow>(
            r#"
            SELECT v.id, v.establishment_id, e.name AS establishment_name,
                   v.scheduled_date, v.visit_type
            FROM visits v
            JOIN establishments e ON e.id = v.establishment_id
            WHERE v.scheduled_date >= NOW()
            ORDER BY v.scheduled_date ASC
            LIMIT $1
            "#,
        )
        .bind(UPCOMING_VISITS_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list upcoming visits"))?;

        Ok(rows.into_iter().map(UpcomingVisitDto::from).collect())
    }

    /// Urgent commission prescriptions still to correct, newest first
    pub async fn urgent_prescriptions(&self) -> Result<Vec<UrgentPrescriptionDto>> {
        let rows = sqlx::query_as::<_, UrgentPrescriptionRow>(
            r#"
            SELECT p.id, p.number, p.description,
                   c.id AS commission_id, c.kind AS commission_kind,
                   c.date AS commission_date, c.commission_type,
                   e.id AS establishment_id, e.name AS establishment_name
            FROM commission_prescriptions p
            JOIN commissions c ON c.id = p.commission_id
            JOIN establishments e ON e.id = c.establishment_id
            WHERE p.status = 'to_correct' AND p.is_urgent
            ORDER BY p.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(URGENT_PRESCRIPTIONS_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list urgent prescriptions"))?;

        Ok(rows.into_iter().map(UrgentPrescriptionDto::from).collect())
    }
}
