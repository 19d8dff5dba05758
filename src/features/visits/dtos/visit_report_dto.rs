use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::visits::models::{VisitReport, VisitType};

/// Establishment block of the report
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReportEstablishmentDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub category: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReportContactDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub role: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// One line of the verification checklist
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ChecklistItemDto {
    #[serde(default)]
    pub done: bool,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Everything printed on a visit report
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct VisitReportRequestDto {
    pub establishment_id: Uuid,
    #[validate(nested)]
    pub establishment: ReportEstablishmentDto,
    pub visit_date: NaiveDate,
    pub visit_type: VisitType,
    /// Consultant signing the report
    #[validate(length(min = 1, message = "Consultant is required"))]
    pub consultant_id: String,
    #[validate(nested)]
    pub contact: ReportContactDto,
    #[validate(length(max = 10000))]
    pub observations: Option<String>,
    #[validate(nested)]
    #[serde(default)]
    pub technical_checks: ChecklistItemDto,
    #[validate(nested)]
    #[serde(default)]
    pub safety_register: ChecklistItemDto,
    #[validate(nested)]
    #[serde(default)]
    pub staff_training: ChecklistItemDto,
    #[validate(nested)]
    #[serde(default)]
    pub prescriptions: ChecklistItemDto,
    #[validate(length(min = 1, max = 10000, message = "Conclusion is required"))]
    pub conclusion: String,
    #[validate(length(max = 10000))]
    pub actions: Option<String>,
    pub next_visit_date: Option<NaiveDate>,
    pub next_visit_type: Option<VisitType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisitReportDto {
    pub id: Uuid,
    pub visit_id: Uuid,
    pub establishment_id: Uuid,
    pub consultant_id: String,
    pub report_url: String,
    pub report_date: DateTime<Utc>,
    pub report_type: String,
    pub file_path: String,
    pub created_at: DateTime<Utc>,
}

impl From<VisitReport> for VisitReportDto {
    fn from(r: VisitReport) -> Self {
        Self {
            id: r.id,
            visit_id: r.visit_id,
            establishment_id: r.establishment_id,
            consultant_id: r.consultant_id,
            report_url: r.report_url,
            report_date: r.report_date,
            report_type: r.report_type,
            file_path: r.file_path,
            created_at: r.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: serde_json::Value) -> VisitReportRequestDto {
        serde_json::from_value(value).unwrap()
    }

    fn minimal() -> serde_json::Value {
        serde_json::json!({
            "establishment_id": "6d1f5a0e-8f7a-4c55-9a4c-0d7c2f3b9e11",
            "establishment": {
                "name": "Hôtel du Lac",
                "address": "3 quai des Pêcheurs",
                "postal_code": "74000",
                "city": "Annecy",
                "category": "3ème catégorie"
            },
            "visit_date": "2026-03-12",
            "visit_type": "first_visit",
            "consultant_id": "consultant-1",
            "contact": { "name": "Claire Martin", "role": "Directrice" },
            "conclusion": "Établissement conforme."
        })
    }

    #[test]
    fn test_checklist_defaults_to_not_done() {
        let dto = request(minimal());
        assert!(dto.validate().is_ok());
        assert!(!dto.technical_checks.done);
        assert!(dto.establishment.types.is_empty());
    }

    #[test]
    fn test_empty_conclusion_is_rejected() {
        let mut value = minimal();
        value["conclusion"] = serde_json::json!("");
        assert!(request(value).validate().is_err());
    }

    #[test]
    fn test_invalid_contact_email_is_rejected() {
        let mut value = minimal();
        value["contact"]["email"] = serde_json::json!("pas-un-email");
        assert!(request(value).validate().is_err());
    }
}
