use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::types::BadgeVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "regulatory_file_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RegulatoryFileStatus {
    InProgress,
    ReportSent,
    Archived,
}

impl RegulatoryFileStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RegulatoryFileStatus::InProgress => "En cours",
            RegulatoryFileStatus::ReportSent => "Rapport envoyé",
            RegulatoryFileStatus::Archived => "Archivé",
        }
    }

    pub fn badge(&self) -> BadgeVariant {
        match self {
            RegulatoryFileStatus::InProgress => BadgeVariant::Default,
            RegulatoryFileStatus::ReportSent => BadgeVariant::Secondary,
            RegulatoryFileStatus::Archived => BadgeVariant::Outline,
        }
    }
}

/// Permit or authorization file submitted to the authorities
#[derive(Debug, Clone, FromRow)]
pub struct RegulatoryFile {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub file_number: String,
    pub submission_date: NaiveDate,
    pub deadline_date: Option<NaiveDate>,
    pub status: RegulatoryFileStatus,
    pub notes: Option<String>,
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct RegulatoryFileRow {
    #[sqlx(flatten)]
    pub file: RegulatoryFile,
    pub establishment_name: String,
}
