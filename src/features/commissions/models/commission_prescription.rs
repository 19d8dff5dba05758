use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::types::BadgeVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "commission_prescription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CommissionPrescriptionStatus {
    Corrected,
    ToCorrect,
    NotApplicable,
}

impl CommissionPrescriptionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CommissionPrescriptionStatus::Corrected => "Corrigée",
            CommissionPrescriptionStatus::ToCorrect => "À corriger",
            CommissionPrescriptionStatus::NotApplicable => "Non applicable",
        }
    }

    pub fn badge(&self) -> BadgeVariant {
        match self {
            CommissionPrescriptionStatus::Corrected => BadgeVariant::Secondary,
            CommissionPrescriptionStatus::ToCorrect => BadgeVariant::Destructive,
            CommissionPrescriptionStatus::NotApplicable => BadgeVariant::Outline,
        }
    }
}

/// Database model for a prescription issued by a commission
#[derive(Debug, Clone, FromRow)]
pub struct CommissionPrescription {
    pub id: Uuid,
    pub commission_id: Uuid,
    pub number: i32,
    pub description: String,
    pub reference: String,
    pub status: CommissionPrescriptionStatus,
    pub is_urgent: bool,
    pub comment: Option<String>,
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_presentation() {
        assert_eq!(CommissionPrescriptionStatus::ToCorrect.label(), "À corriger");
        assert_eq!(
            CommissionPrescriptionStatus::ToCorrect.badge(),
            BadgeVariant::Destructive
        );
        assert_eq!(
            CommissionPrescriptionStatus::Corrected.badge(),
            BadgeVariant::Secondary
        );
    }
}
