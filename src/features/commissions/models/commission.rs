use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::types::BadgeVariant;

/// Safety (ERP fire safety) or accessibility commission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "commission_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CommissionKind {
    #[default]
    Safety,
    Accessibility,
}

impl std::fmt::Display for CommissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommissionKind::Safety => write!(f, "safety"),
            CommissionKind::Accessibility => write!(f, "accessibility"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "commission_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CommissionType {
    Communale,
    Arrondissement,
    Departementale,
}

impl CommissionType {
    pub fn label(&self) -> &'static str {
        match self {
            CommissionType::Communale => "Communale",
            CommissionType::Arrondissement => "Arrondissement",
            CommissionType::Departementale => "Départementale",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "commission_purpose", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CommissionPurpose {
    EtudeAutorisationTravaux,
    EtudePermisConstruire,
    DemandeAvis,
    LeveePrescription,
    EtudeDerogation,
    VisitePeriodique,
    VisiteInopinee,
    ReceptionTravaux,
    VisiteOuverture,
    VisiteChantier,
}

impl CommissionPurpose {
    pub fn label(&self) -> &'static str {
        match self {
            CommissionPurpose::EtudeAutorisationTravaux => "Étude d'autorisation de travaux",
            CommissionPurpose::EtudePermisConstruire => "Étude de permis de construire",
            CommissionPurpose::DemandeAvis => "Demande d'avis",
            CommissionPurpose::LeveePrescription => "Levée de prescription",
            CommissionPurpose::EtudeDerogation => "Étude de demande de dérogation",
            CommissionPurpose::VisitePeriodique => "Visite périodique",
            CommissionPurpose::VisiteInopinee => "Visite inopinée",
            CommissionPurpose::ReceptionTravaux => "Visite de réception de travaux",
            CommissionPurpose::VisiteOuverture => "Visite d'ouverture",
            CommissionPurpose::VisiteChantier => "Visite de chantier",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "commission_opinion", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CommissionOpinion {
    Favorable,
    Defavorable,
}

impl CommissionOpinion {
    pub fn label(&self) -> &'static str {
        match self {
            CommissionOpinion::Favorable => "Favorable",
            CommissionOpinion::Defavorable => "Défavorable",
        }
    }

    pub fn badge(&self) -> BadgeVariant {
        match self {
            CommissionOpinion::Favorable => BadgeVariant::Secondary,
            CommissionOpinion::Defavorable => BadgeVariant::Destructive,
        }
    }
}

/// Why the commission sat; exposed as `type` in list filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "commission_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CommissionCategory {
    Periodic,
    WorkReception,
    Opening,
    Exceptional,
}

impl CommissionCategory {
    pub fn label(&self) -> &'static str {
        match self {
            CommissionCategory::Periodic => "Périodique",
            CommissionCategory::WorkReception => "Réception de travaux",
            CommissionCategory::Opening => "Ouverture d'établissement",
            CommissionCategory::Exceptional => "Exceptionnelle",
        }
    }

    pub fn badge(&self) -> BadgeVariant {
        match self {
            CommissionCategory::Periodic => BadgeVariant::Default,
            CommissionCategory::WorkReception => BadgeVariant::Secondary,
            CommissionCategory::Opening => BadgeVariant::Destructive,
            CommissionCategory::Exceptional => BadgeVariant::Outline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "commission_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    InProgress,
    ReportSent,
    Archived,
}

impl CommissionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CommissionStatus::InProgress => "En cours",
            CommissionStatus::ReportSent => "PV reçu",
            CommissionStatus::Archived => "Archivé",
        }
    }

    pub fn badge(&self) -> BadgeVariant {
        match self {
            CommissionStatus::InProgress => BadgeVariant::Default,
            CommissionStatus::ReportSent => BadgeVariant::Secondary,
            CommissionStatus::Archived => BadgeVariant::Outline,
        }
    }
}

/// Database model for commission
#[derive(Debug, Clone, FromRow)]
pub struct Commission {
    pub id: Uuid,
    pub kind: CommissionKind,
    pub establishment_id: Uuid,
    pub date: NaiveDate,
    pub commission_type: CommissionType,
    pub purpose: CommissionPurpose,
    pub opinion: CommissionOpinion,
    pub category: CommissionCategory,
    pub status: CommissionStatus,
    pub responsible_id: Option<String>,
    pub minutes_received: bool,
    pub report_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Commission joined with the names shown next to it in lists
#[derive(Debug, Clone, FromRow)]
pub struct CommissionRow {
    #[sqlx(flatten)]
    pub commission: Commission,
    pub establishment_name: String,
    pub establishment_address: String,
    pub responsible_name: Option<String>,
}

/// Data for creating a new commission
#[derive(Debug)]
pub struct CreateCommission {
    pub kind: CommissionKind,
    pub establishment_id: Uuid,
    pub date: NaiveDate,
    pub commission_type: CommissionType,
    pub purpose: CommissionPurpose,
    pub opinion: CommissionOpinion,
    pub category: CommissionCategory,
    pub status: CommissionStatus,
    pub responsible_id: Option<String>,
    pub minutes_received: bool,
    pub report_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_presentation() {
        let expected = [
            (CommissionCategory::Periodic, "Périodique", BadgeVariant::Default),
            (
                CommissionCategory::WorkReception,
                "Réception de travaux",
                BadgeVariant::Secondary,
            ),
            (
                CommissionCategory::Opening,
                "Ouverture d'établissement",
                BadgeVariant::Destructive,
            ),
            (
                CommissionCategory::Exceptional,
                "Exceptionnelle",
                BadgeVariant::Outline,
            ),
        ];
        for (category, label, badge) in expected {
            assert_eq!(category.label(), label);
            assert_eq!(category.badge(), badge);
        }
    }

    #[test]
    fn test_status_and_opinion_presentation() {
        assert_eq!(CommissionStatus::ReportSent.label(), "PV reçu");
        assert_eq!(CommissionStatus::Archived.badge(), BadgeVariant::Outline);
        assert_eq!(CommissionOpinion::Defavorable.label(), "Défavorable");
        assert_eq!(
            CommissionOpinion::Defavorable.badge(),
            BadgeVariant::Destructive
        );
    }

    #[test]
    fn test_purpose_serializes_snake_case() {
        let json = serde_json::to_string(&CommissionPurpose::EtudePermisConstruire).unwrap();
        assert_eq!(json, "\"etude_permis_construire\"");
        assert_eq!(
            CommissionPurpose::ReceptionTravaux.label(),
            "Visite de réception de travaux"
        );
    }
}
