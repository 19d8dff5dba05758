use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::commissions::models::CommissionCategory;
use crate::shared::types::BadgeVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "prescription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PrescriptionStatus {
    Todo,
    InProgress,
    Done,
    NotApplicable,
}

impl PrescriptionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PrescriptionStatus::Todo => "À faire",
            PrescriptionStatus::InProgress => "En cours",
            PrescriptionStatus::Done => "Fait",
            PrescriptionStatus::NotApplicable => "Non applicable",
        }
    }

    pub fn badge(&self) -> BadgeVariant {
        match self {
            PrescriptionStatus::Todo => BadgeVariant::Destructive,
            PrescriptionStatus::InProgress => BadgeVariant::Default,
            PrescriptionStatus::Done => BadgeVariant::Secondary,
            PrescriptionStatus::NotApplicable => BadgeVariant::Outline,
        }
    }
}

/// Where the corrective action came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "prescription_source", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PrescriptionSource {
    Commission,
    Visit,
    Internal,
}

impl PrescriptionSource {
    pub fn label(&self) -> &'static str {
        match self {
            PrescriptionSource::Commission => "Commission",
            PrescriptionSource::Visit => "Visite",
            PrescriptionSource::Internal => "Interne",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Prescription {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub commission_id: Option<Uuid>,
    pub description: String,
    pub status: PrescriptionStatus,
    pub source: PrescriptionSource,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Prescription joined with its establishment and originating commission
#[derive(Debug, Clone, FromRow)]
pub struct PrescriptionRow {
    #[sqlx(flatten)]
    pub prescription: Prescription,
    pub establishment_name: String,
    pub establishment_address: String,
    pub commission_date: Option<NaiveDate>,
    pub commission_category: Option<CommissionCategory>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_presentation() {
        let all = [
            PrescriptionStatus::Todo,
            PrescriptionStatus::InProgress,
            PrescriptionStatus::Done,
            PrescriptionStatus::NotApplicable,
        ];
        let badges: Vec<BadgeVariant> = all.iter().map(|s| s.badge()).collect();
        assert_eq!(
            badges,
            vec![
                BadgeVariant::Destructive,
                BadgeVariant::Default,
                BadgeVariant::Secondary,
                BadgeVariant::Outline
            ]
        );
        assert_eq!(PrescriptionStatus::Done.label(), "Fait");
    }
}
