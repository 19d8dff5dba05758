use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::establishments::dtos::EstablishmentSummaryDto;
use crate::features::regulatory_files::models::{RegulatoryFileRow, RegulatoryFileStatus};
use crate::shared::types::BadgeVariant;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegulatoryFileResponseDto {
    pub id: Uuid,
    pub establishment: EstablishmentSummaryDto,
    pub file_number: String,
    pub submission_date: NaiveDate,
    pub deadline_date: Option<NaiveDate>,
    pub status: RegulatoryFileStatus,
    pub status_label: String,
    pub status_badge: BadgeVariant,
    pub notes: Option<String>,
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RegulatoryFileRow> for RegulatoryFileResponseDto {
    fn from(row: RegulatoryFileRow) -> Self {
        let f = row.file;
        Self {
            id: f.id,
            establishment: EstablishmentSummaryDto::new(f.establishment_id, row.establishment_name),
            file_number: f.file_number,
            submission_date: f.submission_date,
            deadline_date: f.deadline_date,
            status_label: f.status.label().to_string(),
            status_badge: f.status.badge(),
            status: f.status,
            notes: f.notes,
            attachment_url: f.attachment_url,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRegulatoryFileDto {
    pub establishment_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "File number must be 1-100 characters"))]
    pub file_number: String,
    pub submission_date: NaiveDate,
    pub deadline_date: Option<NaiveDate>,
    pub status: Option<RegulatoryFileStatus>,
    pub notes: Option<String>,
    #[validate(url(message = "Attachment URL must be a valid URL"))]
    pub attachment_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateRegulatoryFileDto {
    #[validate(length(min = 1, max = 100, message = "File number must be 1-100 characters"))]
    pub file_number: Option<String>,
    pub submission_date: Option<NaiveDate>,
    pub deadline_date: Option<NaiveDate>,
    pub status: Option<RegulatoryFileStatus>,
    pub notes: Option<String>,
    #[validate(url(message = "Attachment URL must be a valid URL"))]
    pub attachment_url: Option<String>,
}
