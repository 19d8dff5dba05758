use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::commissions::models::{
    CommissionCategory, CommissionKind, CommissionOpinion, CommissionPrescription,
    CommissionPrescriptionStatus, CommissionPurpose, CommissionRow, CommissionStatus,
    CommissionType, CreateCommission,
};
use crate::features::establishments::dtos::EstablishmentSummaryDto;
use crate::features::users::dtos::UserSummaryDto;
use crate::shared::types::BadgeVariant;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommissionPrescriptionResponseDto {
    pub id: Uuid,
    pub commission_id: Uuid,
    pub number: i32,
    pub description: String,
    pub reference: String,
    pub status: CommissionPrescriptionStatus,
    pub status_label: String,
    pub status_badge: BadgeVariant,
    pub is_urgent: bool,
    pub comment: Option<String>,
    pub attachment_url: Option<String>,
}

impl From<CommissionPrescription> for CommissionPrescriptionResponseDto {
    fn from(p: CommissionPrescription) -> Self {
        Self {
            id: p.id,
            commission_id: p.commission_id,
            number: p.number,
            description: p.description,
            reference: p.reference,
            status_label: p.status.label().to_string(),
            status_badge: p.status.badge(),
            status: p.status,
            is_urgent: p.is_urgent,
            comment: p.comment,
            attachment_url: p.attachment_url,
        }
    }
}

/// Commission with its establishment, responsible user and prescriptions
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommissionResponseDto {
    pub id: Uuid,
    pub kind: CommissionKind,
    pub establishment: EstablishmentSummaryDto,
    pub date: NaiveDate,
    pub commission_type: CommissionType,
    pub commission_type_label: String,
    pub purpose: CommissionPurpose,
    pub purpose_label: String,
    pub opinion: CommissionOpinion,
    pub opinion_label: String,
    pub opinion_badge: BadgeVariant,
    pub category: CommissionCategory,
    pub category_label: String,
    pub category_badge: BadgeVariant,
    pub status: CommissionStatus,
    pub status_label: String,
    pub status_badge: BadgeVariant,
    pub responsible: Option<UserSummaryDto>,
    pub minutes_received: bool,
    pub report_url: Option<String>,
    pub prescriptions: Vec<CommissionPrescriptionResponseDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommissionResponseDto {
    pub fn assemble(row: CommissionRow, prescriptions: Vec<CommissionPrescription>) -> Self {
        let CommissionRow {
            commission: c,
            establishment_name,
            establishment_address,
            responsible_name,
        } = row;

        let responsible = match (c.responsible_id, responsible_name) {
            (Some(id), Some(full_name)) => Some(UserSummaryDto { id, full_name }),
            _ => None,
        };

        Self {
            id: c.id,
            kind: c.kind,
            establishment: EstablishmentSummaryDto::with_address(
                c.establishment_id,
                establishment_name,
                establishment_address,
            ),
            date: c.date,
            commission_type_label: c.commission_type.label().to_string(),
            commission_type: c.commission_type,
            purpose_label: c.purpose.label().to_string(),
            purpose: c.purpose,
            opinion_label: c.opinion.label().to_string(),
            opinion_badge: c.opinion.badge(),
            opinion: c.opinion,
            category_label: c.category.label().to_string(),
            category_badge: c.category.badge(),
            category: c.category,
            status_label: c.status.label().to_string(),
            status_badge: c.status.badge(),
            status: c.status,
            responsible,
            minutes_received: c.minutes_received,
            report_url: c.report_url,
            prescriptions: prescriptions.into_iter().map(Into::into).collect(),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// `?kind=` selector shared by commission list endpoints
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CommissionKindQuery {
    #[serde(default)]
    pub kind: CommissionKind,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCommissionDto {
    #[serde(default)]
    pub kind: CommissionKind,
    pub establishment_id: Uuid,
    pub date: NaiveDate,
    pub commission_type: CommissionType,
    pub purpose: CommissionPurpose,
    pub opinion: CommissionOpinion,
    pub category: Option<CommissionCategory>,
    pub status: Option<CommissionStatus>,
    #[validate(length(min = 1, message = "Responsible user id must not be empty"))]
    pub responsible_id: Option<String>,
    #[serde(default)]
    pub minutes_received: bool,
    #[validate(url(message = "Report URL must be a valid URL"))]
    pub report_url: Option<String>,
}

impl From<CreateCommissionDto> for CreateCommission {
    fn from(dto: CreateCommissionDto) -> Self {
        Self {
            kind: dto.kind,
            establishment_id: dto.establishment_id,
            date: dto.date,
            commission_type: dto.commission_type,
            purpose: dto.purpose,
            opinion: dto.opinion,
            category: dto.category.unwrap_or(CommissionCategory::Periodic),
            status: dto.status.unwrap_or(CommissionStatus::InProgress),
            responsible_id: dto.responsible_id,
            minutes_received: dto.minutes_received,
            report_url: dto.report_url,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCommissionDto {
    pub date: Option<NaiveDate>,
    pub commission_type: Option<CommissionType>,
    pub purpose: Option<CommissionPurpose>,
    pub opinion: Option<CommissionOpinion>,
    pub category: Option<CommissionCategory>,
    pub status: Option<CommissionStatus>,
    #[validate(length(min = 1, message = "Responsible user id must not be empty"))]
    pub responsible_id: Option<String>,
    pub minutes_received: Option<bool>,
    #[validate(url(message = "Report URL must be a valid URL"))]
    pub report_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCommissionPrescriptionDto {
    #[validate(range(min = 1, message = "Number must be positive"))]
    pub number: i32,
    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: String,
    #[validate(length(max = 200, message = "Reference must not exceed 200 characters"))]
    #[serde(default)]
    pub reference: String,
    pub status: Option<CommissionPrescriptionStatus>,
    #[serde(default)]
    pub is_urgent: bool,
    pub comment: Option<String>,
    #[validate(url(message = "Attachment URL must be a valid URL"))]
    pub attachment_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCommissionPrescriptionDto {
    #[validate(range(min = 1, message = "Number must be positive"))]
    pub number: Option<i32>,
    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 200, message = "Reference must not exceed 200 characters"))]
    pub reference: Option<String>,
    pub status: Option<CommissionPrescriptionStatus>,
    pub is_urgent: Option<bool>,
    pub comment: Option<String>,
    #[validate(url(message = "Attachment URL must be a valid URL"))]
    pub attachment_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::commissions::models::Commission;

    fn commission_row(category: CommissionCategory) -> CommissionRow {
        let now = Utc::now();
        CommissionRow {
            commission: Commission {
                id: Uuid::new_v4(),
                kind: CommissionKind::Safety,
                establishment_id: Uuid::new_v4(),
                date: NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(),
                commission_type: CommissionType::Communale,
                purpose: CommissionPurpose::VisitePeriodique,
                opinion: CommissionOpinion::Favorable,
                category,
                status: CommissionStatus::InProgress,
                responsible_id: Some("u1".to_string()),
                minutes_received: false,
                report_url: None,
                created_at: now,
                updated_at: now,
            },
            establishment_name: "Théâtre municipal".to_string(),
            establishment_address: "2 place de l'Opéra".to_string(),
            responsible_name: Some("Claire Martin".to_string()),
        }
    }

    #[test]
    fn test_assemble_nests_prescriptions_and_labels() {
        let row = commission_row(CommissionCategory::WorkReception);
        let commission_id = row.commission.id;
        let now = Utc::now();
        let prescription = CommissionPrescription {
            id: Uuid::new_v4(),
            commission_id,
            number: 1,
            description: "Remplacer les blocs BAES".to_string(),
            reference: "EC 12".to_string(),
            status: CommissionPrescriptionStatus::ToCorrect,
            is_urgent: true,
            comment: None,
            attachment_url: None,
            created_at: now,
            updated_at: now,
        };

        let dto = CommissionResponseDto::assemble(row, vec![prescription]);
        assert_eq!(dto.category_label, "Réception de travaux");
        assert_eq!(dto.purpose_label, "Visite périodique");
        assert_eq!(dto.responsible.as_ref().map(|r| r.id.as_str()), Some("u1"));
        assert_eq!(dto.prescriptions.len(), 1);
        assert_eq!(dto.prescriptions[0].status_label, "À corriger");
        assert_eq!(dto.establishment.name, "Théâtre municipal");
    }

    #[test]
    fn test_kind_defaults_to_safety() {
        let query: CommissionKindQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.kind, CommissionKind::Safety);
    }
}
