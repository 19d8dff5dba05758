use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::establishments::dtos::EstablishmentSummaryDto;
use crate::features::verifications::models::{
    RegulationType, TechnicalInstallation, VerificationRow, VerificationStatus,
};
use crate::shared::types::BadgeVariant;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TechnicalInstallationDto {
    pub id: Uuid,
    pub name: String,
    pub regulation_type: RegulationType,
    pub regulation_type_label: String,
    pub verification_period_months: i32,
}

impl From<TechnicalInstallation> for TechnicalInstallationDto {
    fn from(i: TechnicalInstallation) -> Self {
        Self {
            id: i.id,
            name: i.name,
            regulation_type_label: i.regulation_type.label().to_string(),
            regulation_type: i.regulation_type,
            verification_period_months: i.verification_period_months,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerificationResponseDto {
    pub id: Uuid,
    pub establishment: EstablishmentSummaryDto,
    pub installation: TechnicalInstallationDto,
    pub verification_date: NaiveDate,
    pub next_verification_date: Option<NaiveDate>,
    pub provider_name: String,
    pub status: VerificationStatus,
    pub status_label: String,
    pub status_badge: BadgeVariant,
    pub observations: Option<String>,
    pub report_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VerificationRow> for VerificationResponseDto {
    fn from(row: VerificationRow) -> Self {
        let v = row.verification;
        Self {
            id: v.id,
            establishment: EstablishmentSummaryDto::with_address(
                v.establishment_id,
                row.establishment_name,
                row.establishment_address,
            ),
            installation: TechnicalInstallationDto {
                id: v.installation_id,
                name: row.installation_name,
                regulation_type_label: row.installation_regulation_type.label().to_string(),
                regulation_type: row.installation_regulation_type,
                verification_period_months: row.installation_period_months,
            },
            verification_date: v.verification_date,
            next_verification_date: v.next_verification_date,
            provider_name: v.provider_name,
            status_label: v.status.label().to_string(),
            status_badge: v.status.badge(),
            status: v.status,
            observations: v.observations,
            report_url: v.report_url,
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTechnicalInstallationDto {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    pub regulation_type: RegulationType,
    #[validate(range(min = 1, max = 120, message = "Period must be 1-120 months"))]
    pub verification_period_months: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateVerificationDto {
    pub establishment_id: Uuid,
    pub installation_id: Uuid,
    pub verification_date: NaiveDate,
    /// Defaults to `verification_date` plus the installation's period
    pub next_verification_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 200, message = "Provider name must be 1-200 characters"))]
    pub provider_name: String,
    pub status: Option<VerificationStatus>,
    pub observations: Option<String>,
    #[validate(url(message = "Report URL must be a valid URL"))]
    pub report_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateVerificationDto {
    pub verification_date: Option<NaiveDate>,
    pub next_verification_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 200, message = "Provider name must be 1-200 characters"))]
    pub provider_name: Option<String>,
    pub status: Option<VerificationStatus>,
    pub observations: Option<String>,
    #[validate(url(message = "Report URL must be a valid URL"))]
    pub report_url: Option<String>,
}
