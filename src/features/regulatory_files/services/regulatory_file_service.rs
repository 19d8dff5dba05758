use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{db_error, AppError, Result};
use crate::features::regulatory_files::dtos::{
    CreateRegulatoryFileDto, RegulatoryFileResponseDto, UpdateRegulatoryFileDto,
};
use crate::features::regulatory_files::models::{RegulatoryFileRow, RegulatoryFileStatus};

const SELECT_FILE_ROWS: &str = r#"
    SELECT f.*, e.name AS establishment_name
    FROM regulatory_files f
    JOIN establishments e ON e.id = f.establishment_id
"#;

pub struct RegulatoryFileService {
    pool: PgPool,
}

impl RegulatoryFileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Most recent submissions first
    pub async fn list(&self) -> Result<Vec<RegulatoryFileResponseDto>> {
        let rows = sqlx::query_as::<_, RegulatoryFileRow>(&format!(
            "{} ORDER BY f.submission_date DESC, f.created_at DESC",
            SELECT_FILE_ROWS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list regulatory files"))?;

        debug!("Fetched {} regulatory files", rows.len());
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Closest deadline first
    pub async fn list_by_establishment(
        &self,
        establishment_id: Uuid,
    ) -> Result<Vec<RegulatoryFileResponseDto>> {
        let rows = sqlx::query_as::<_, RegulatoryFileRow>(&format!(
            "{} WHERE f.establishment_id = $1 ORDER BY f.deadline_date ASC NULLS LAST",
            SELECT_FILE_ROWS
        ))
        .bind(establishment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list establishment regulatory files"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<RegulatoryFileResponseDto> {
        let row = sqlx::query_as::<_, RegulatoryFileRow>(&format!(
            "{} WHERE f.id = $1",
            SELECT_FILE_ROWS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get regulatory file"))?
        .ok_or_else(|| AppError::NotFound(format!("Regulatory file {} not found", id)))?;

        Ok(row.into())
    }

    pub async fn create(&self, dto: CreateRegulatoryFileDto) -> Result<RegulatoryFileResponseDto> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO regulatory_files (
                establishment_id, file_number, submission_date, deadline_date,
                status, notes, attachment_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(dto.establishment_id)
        .bind(dto.file_number.trim())
        .bind(dto.submission_date)
        .bind(dto.deadline_date)
        .bind(dto.status.unwrap_or(RegulatoryFileStatus::InProgress))
        .bind(&dto.notes)
        .bind(&dto.attachment_url)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create regulatory file"))?;

        info!(
            "Regulatory file created: id={}, number={}",
            id,
            dto.file_number.trim()
        );
        self.get_by_id(id).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateRegulatoryFileDto,
    ) -> Result<RegulatoryFileResponseDto> {
        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE regulatory_files
            SET file_number = COALESCE($2, file_number),
                submission_date = COALESCE($3, submission_date),
                deadline_date = COALESCE($4, deadline_date),
                status = COALESCE($5, status),
                notes = COALESCE($6, notes),
                attachment_url = COALESCE($7, attachment_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(dto.file_number)
        .bind(dto.submission_date)
        .bind(dto.deadline_date)
        .bind(dto.status)
        .bind(dto.notes)
        .bind(dto.attachment_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update regulatory file"))?;

        if updated.is_none() {
            return Err(AppError::NotFound(format!(
                "Regulatory file {} not found",
                id
            )));
        }

        info!("Regulatory file updated: id={}", id);
        self.get_by_id(id).await
    }
}
