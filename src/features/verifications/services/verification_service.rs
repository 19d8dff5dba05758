use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{db_error, AppError, Result};
use crate::features::verifications::dtos::{
    CreateTechnicalInstallationDto, CreateVerificationDto, TechnicalInstallationDto,
    UpdateVerificationDto, VerificationResponseDto,
};
use crate::features::verifications::models::{
    TechnicalInstallation, VerificationRow, VerificationStatus,
};

const SELECT_VERIFICATION_ROWS: &str = r#"
    SELECT v.*,
           e.name AS establishment_name,
           e.address AS establishment_address,
           ti.name AS installation_name,
           ti.regulation_type AS installation_regulation_type,
           ti.verification_period_months AS installation_period_months
    FROM verifications v
    JOIN establishments e ON e.id = v.establishment_id
    JOIN technical_installations ti ON ti.id = v.installation_id
"#;

/// Technical installations and their periodic verifications
pub struct VerificationService {
    pool: PgPool,
}

impl VerificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_installations(&self) -> Result<Vec<TechnicalInstallationDto>> {
        let installations = sqlx::query_as::<_, TechnicalInstallation>(
            "SELECT * FROM technical_installations ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list technical installations"))?;

        Ok(installations.into_iter().map(Into::into).collect())
    }

    pub async fn create_installation(
        &self,
        dto: CreateTechnicalInstallationDto,
    ) -> Result<TechnicalInstallationDto> {
        let installation = sqlx::query_as::<_, TechnicalInstallation>(
            r#"
            INSERT INTO technical_installations (name, regulation_type, verification_period_months)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(dto.name.trim())
        .bind(dto.regulation_type)
        .bind(dto.verification_period_months)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create technical installation"))?;

        info!(
            "Technical installation created: id={}, name={}",
            installation.id, installation.name
        );
        Ok(installation.into())
    }

    /// Most recent verifications first
    pub async fn list(&self) -> Result<Vec<VerificationResponseDto>> {
        let rows = sqlx::query_as::<_, VerificationRow>(&format!(
            "{} ORDER BY v.verification_date DESC, v.created_at DESC",
            SELECT_VERIFICATION_ROWS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list verifications"))?;

        debug!("Fetched {} verifications", rows.len());
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Next verification due first
    pub async fn list_by_establishment(
        &self,
        establishment_id: Uuid,
    ) -> Result<Vec<VerificationResponseDto>> {
        let rows = sqlx::query_as::<_, VerificationRow>(&format!(
            "{} WHERE v.establishment_id = $1 ORDER BY v.next_verification_date ASC NULLS LAST",
            SELECT_VERIFICATION_ROWS
        ))
        .bind(establishment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list establishment verifications"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<VerificationResponseDto> {
        let row = sqlx::query_as::<_, VerificationRow>(&format!(
            "{} WHERE v.id = $1",
            SELECT_VERIFICATION_ROWS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get verification"))?
        .ok_or_else(|| AppError::NotFound(format!("Verification {} not found", id)))?;

        Ok(row.into())
    }

    pub async fn create(&self, dto: CreateVerificationDto) -> Result<VerificationResponseDto> {
        let installation = sqlx::query_as::<_, TechnicalInstallation>(
            "SELECT * FROM technical_installations WHERE id = $1",
        )
        .bind(dto.installation_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get technical installation"))?
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Technical installation {} does not exist",
                dto.installation_id
            ))
        })?;

        let next_date = dto
            .next_verification_date
            .or_else(|| installation.next_due(dto.verification_date));

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO verifications (
                establishment_id, installation_id, verification_date, next_verification_date,
                provider_name, status, observations, report_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(dto.establishment_id)
        .bind(installation.id)
        .bind(dto.verification_date)
        .bind(next_date)
        .bind(dto.provider_name.trim())
        .bind(dto.status.unwrap_or(VerificationStatus::Pending))
        .bind(&dto.observations)
        .bind(&dto.report_url)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create verification"))?;

        info!(
            "Verification created: id={}, installation={}, next={:?}",
            id, installation.name, next_date
        );
        self.get_by_id(id).await
    }

    pub async fn update(&self, id: Uuid, dto: UpdateVerificationDto) -> Result<VerificationResponseDto> {
        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE verifications
            SET verification_date = COALESCE($2, verification_date),
                next_verification_date = COALESCE($3, next_verification_date),
                provider_name = COALESCE($4, provider_name),
                status = COALESCE($5, status),
                observations = COALESCE($6, observations),
                report_url = COALESCE($7, report_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(dto.verification_date)
        .bind(dto.next_verification_date)
        .bind(dto.provider_name)
        .bind(dto.status)
        .bind(dto.observations)
        .bind(dto.report_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update verification"))?;

        if updated.is_none() {
            return Err(AppError::NotFound(format!("Verification {} not found", id)));
        }

        info!("Verification updated: id={}", id);
        self.get_by_id(id).await
    }
}
