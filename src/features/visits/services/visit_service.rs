use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{db_error, AppError, Result};
use crate::features::visits::dtos::{
    CreateVisitDto, UpdateVisitDto, VisitReportDto, VisitResponseDto,
};
use crate::features::visits::models::{VisitReport, VisitRow};

const SELECT_VISIT_ROWS: &str = r#"
    SELECT v.*,
           e.name AS establishment_name,
           e.address AS establishment_address,
           u.full_name AS consultant_name
    FROM visits v
    JOIN establishments e ON e.id = v.establishment_id
    LEFT JOIN users u ON u.id = v.consultant_id
"#;

pub struct VisitService {
    pool: PgPool,
}

impl VisitService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All visits in calendar order
    pub async fn list(&self) -> Result<Vec<VisitResponseDto>> {
        let rows = sqlx::query_as::<_, VisitRow>(&format!(
            "{} ORDER BY v.scheduled_date ASC",
            SELECT_VISIT_ROWS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list visits"))?;

        debug!("Fetched {} visits", rows.len());
        Ok(rows.into_iter().map(VisitResponseDto::from).collect())
    }

    pub async fn list_by_establishment(
        &self,
        establishment_id: Uuid,
    ) -> Result<Vec<VisitResponseDto>> {
        let rows = sqlx::query_as::<_, VisitRow>(&format!(
            "{} WHERE v.establishment_id = $1 ORDER BY v.scheduled_date ASC",
            SELECT_VISIT_ROWS
        ))
        .bind(establishment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list establishment visits"))?;

        Ok(rows.into_iter().map(VisitResponseDto::from).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VisitResponseDto> {
        sqlx::query_as::<_, VisitRow>(&format!("{} WHERE v.id = $1", SELECT_VISIT_ROWS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to get visit"))?
            .map(VisitResponseDto::from)
            .ok_or_else(|| AppError::NotFound(format!("Visit {} not found", id)))
    }

    pub async fn create(&self, dto: CreateVisitDto) -> Result<VisitResponseDto> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO visits (establishment_id, scheduled_date, visit_type, consultant_id, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(dto.establishment_id)
        .bind(dto.scheduled_date)
        .bind(dto.visit_type)
        .bind(&dto.consultant_id)
        .bind(&dto.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create visit"))?;

        info!(
            "Visit created: id={}, establishment={}, type={:?}",
            id, dto.establishment_id, dto.visit_type
        );
        self.get_by_id(id).await
    }

    pub async fn update(&self, id: Uuid, dto: UpdateVisitDto) -> Result<VisitResponseDto> {
        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE visits SET
                scheduled_date = COALESCE($2, scheduled_date),
                visit_type = COALESCE($3, visit_type),
                consultant_id = COALESCE($4, consultant_id),
                notes = COALESCE($5, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(dto.scheduled_date)
        .bind(dto.visit_type)
        .bind(&dto.consultant_id)
        .bind(&dto.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update visit"))?;

        if updated.is_none() {
            return Err(AppError::NotFound(format!("Visit {} not found", id)));
        }

        info!("Visit updated: id={}", id);
        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM visits WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete visit"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Visit {} not found", id)));
        }

        info!("Visit deleted: id={}", id);
        Ok(())
    }

    /// Reports generated for a visit, newest first
    pub async fn list_reports(&self, visit_id: Uuid) -> Result<Vec<VisitReportDto>> {
        let reports = sqlx::query_as::<_, VisitReport>(
            "SELECT * FROM visit_reports WHERE visit_id = $1 ORDER BY report_date DESC, created_at DESC",
        )
        .bind(visit_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list visit reports"))?;

        Ok(reports.into_iter().map(VisitReportDto::from).collect())
    }
}
