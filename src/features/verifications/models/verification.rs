use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use super::technical_installation::RegulationType;
use crate::shared::types::BadgeVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "verification_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Compliant,
    NonCompliant,
    Pending,
}

impl VerificationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VerificationStatus::Compliant => "Conforme",
            VerificationStatus::NonCompliant => "Non conforme",
            VerificationStatus::Pending => "En attente",
        }
    }

    pub fn badge(&self) -> BadgeVariant {
        match self {
            VerificationStatus::Compliant => BadgeVariant::Secondary,
            VerificationStatus::NonCompliant => BadgeVariant::Destructive,
            VerificationStatus::Pending => BadgeVariant::Outline,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Verification {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub installation_id: Uuid,
    pub verification_date: NaiveDate,
    pub next_verification_date: Option<NaiveDate>,
    pub provider_name: String,
    pub status: VerificationStatus,
    pub observations: Option<String>,
    pub report_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Verification joined with its establishment and installation
#[derive(Debug, Clone, FromRow)]
pub struct VerificationRow {
    #[sqlx(flatten)]
    pub verification: Verification,
    pub establishment_name: String,
    pub establishment_address: String,
    pub installation_name: String,
    pub installation_regulation_type: RegulationType,
    pub installation_period_months: i32,
}
