use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{db_error, AppError, Result};
use crate::features::prescriptions::dtos::{
    CreatePrescriptionDto, PrescriptionResponseDto, UpdatePrescriptionDto,
};
use crate::features::prescriptions::models::{
    PrescriptionRow, PrescriptionSource, PrescriptionStatus,
};

const SELECT_PRESCRIPTION_ROWS: &str = r#"
    SELECT p.*,
           e.name AS establishment_name,
           e.address AS establishment_address,
           c.date AS commission_date,
           c.category AS commission_category
    FROM prescriptions p
    JOIN establishments e ON e.id = p.establishment_id
    LEFT JOIN commissions c ON c.id = p.commission_id
"#;

pub struct PrescriptionService {
    pool: PgPool,
}

impl PrescriptionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All prescriptions, soonest due first; undated ones last
    pub async fn list(&self) -> Result<Vec<PrescriptionResponseDto>> {
        let rows = sqlx::query_as::<_, PrescriptionRow>(&format!(
            "{} ORDER BY p.due_date ASC NULLS LAST, p.created_at",
            SELECT_PRESCRIPTION_ROWS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list prescriptions"))?;

        debug!("Fetched {} prescriptions", rows.len());
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn list_by_establishment(
        &self,
        establishment_id: Uuid,
    ) -> Result<Vec<PrescriptionResponseDto>> {
        let rows = sqlx::query_as::<_, PrescriptionRow>(&format!(
            "{} WHERE p.establishment_id = $1 ORDER BY p.due_date ASC NULLS LAST, p.created_at",
            SELECT_PRESCRIPTION_ROWS
        ))
        .bind(establishment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list establishment prescriptions"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<PrescriptionResponseDto> {
        let row = sqlx::query_as::<_, PrescriptionRow>(&format!(
            "{} WHERE p.id = $1",
            SELECT_PRESCRIPTION_ROWS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get prescription"))?
        .ok_or_else(|| AppError::NotFound(format!("Prescription {} not found", id)))?;

        Ok(row.into())
    }

    pub async fn create(&self, dto: CreatePrescriptionDto) -> Result<PrescriptionResponseDto> {
        let source = dto.source.unwrap_or(if dto.commission_id.is_some() {
            PrescriptionSource::Commission
        } else {
            PrescriptionSource::Internal
        });

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO prescriptions (
                establishment_id, commission_id, description, status, source, due_date
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(dto.establishment_id)
        .bind(dto.commission_id)
        .bind(dto.description.trim())
        .bind(dto.status.unwrap_or(PrescriptionStatus::Todo))
        .bind(source)
        .bind(dto.due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create prescription"))?;

        info!(
            "Prescription created: id={}, establishment={}",
            id, dto.establishment_id
        );
        self.get_by_id(id).await
    }

    pub async fn update(&self, id: Uuid, dto: UpdatePrescriptionDto) -> Result<PrescriptionResponseDto> {
        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE prescriptions
            SET commission_id = COALESCE($2, commission_id),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                source = COALESCE($5, source),
                due_date = COALESCE($6, due_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(dto.commission_id)
        .bind(dto.description)
        .bind(dto.status)
        .bind(dto.source)
        .bind(dto.due_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update prescription"))?;

        if updated.is_none() {
            return Err(AppError::NotFound(format!("Prescription {} not found", id)));
        }

        info!("Prescription updated: id={}", id);
        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM prescriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete prescription"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Prescription {} not found", id)));
        }

        info!("Prescription deleted: id={}", id);
        Ok(())
    }
}
