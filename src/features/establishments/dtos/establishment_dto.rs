use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::commissions::models::CommissionOpinion;
use crate::features::establishments::models::{
    Contact, CreateEstablishment, Establishment, EstablishmentWithGrouping,
};
use crate::shared::types::BadgeVariant;

const DEFAULT_VISIT_PERIODICITY: i32 = 12;

fn default_visit_periodicity() -> i32 {
    DEFAULT_VISIT_PERIODICITY
}

/// Establishment reference embedded in other resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EstablishmentSummaryDto {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl EstablishmentSummaryDto {
    pub fn new(id: Uuid, name: String) -> Self {
        Self {
            id,
            name,
            address: None,
        }
    }

    pub fn with_address(id: Uuid, name: String, address: String) -> Self {
        Self {
            id,
            name,
            address: Some(address),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupingRefDto {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EstablishmentResponseDto {
    pub id: Uuid,
    pub grouping_id: Option<Uuid>,
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub types: Vec<String>,
    pub category: String,
    pub visit_periodicity: i32,
    pub commission_opinion: Option<CommissionOpinion>,
    pub commission_opinion_label: Option<String>,
    pub commission_opinion_badge: Option<BadgeVariant>,
    pub last_commission_date: Option<NaiveDate>,
    pub next_commission_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Establishment> for EstablishmentResponseDto {
    fn from(e: Establishment) -> Self {
        Self {
            id: e.id,
            grouping_id: e.grouping_id,
            name: e.name,
            address: e.address,
            city: e.city,
            postal_code: e.postal_code,
            types: e.types,
            category: e.category,
            visit_periodicity: e.visit_periodicity,
            commission_opinion_label: e.commission_opinion.map(|o| o.label().to_string()),
            commission_opinion_badge: e.commission_opinion.map(|o| o.badge()),
            commission_opinion: e.commission_opinion,
            last_commission_date: e.last_commission_date,
            next_commission_date: e.next_commission_date,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Establishment with its grouping, as shown on the detail page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EstablishmentDetailDto {
    #[serde(flatten)]
    pub establishment: EstablishmentResponseDto,
    pub grouping: Option<GroupingRefDto>,
}

impl From<EstablishmentWithGrouping> for EstablishmentDetailDto {
    fn from(row: EstablishmentWithGrouping) -> Self {
        let grouping = match (row.establishment.grouping_id, row.grouping_name) {
            (Some(id), Some(name)) => Some(GroupingRefDto { id, name }),
            _ => None,
        };
        Self {
            establishment: row.establishment.into(),
            grouping,
        }
    }
}

/// Request DTO for creating an establishment
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateEstablishmentDto {
    pub grouping_id: Option<Uuid>,

    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 500, message = "Address must be 1-500 characters"))]
    pub address: String,

    #[validate(length(max = 100, message = "City must not exceed 100 characters"))]
    #[serde(default)]
    pub city: String,

    #[validate(regex(
        path = "*crate::shared::validation::POSTAL_CODE_REGEX",
        message = "Postal code must be five digits"
    ))]
    pub postal_code: String,

    #[serde(default)]
    pub types: Vec<String>,

    #[validate(length(min = 1, max = 10, message = "Category is required"))]
    pub category: String,

    #[validate(range(min = 1, max = 120, message = "Visit periodicity must be 1-120 months"))]
    #[serde(default = "default_visit_periodicity")]
    pub visit_periodicity: i32,

    pub commission_opinion: Option<CommissionOpinion>,
    pub last_commission_date: Option<NaiveDate>,
    pub next_commission_date: Option<NaiveDate>,
}

impl From<CreateEstablishmentDto> for CreateEstablishment {
    fn from(dto: CreateEstablishmentDto) -> Self {
        Self {
            grouping_id: dto.grouping_id,
            name: dto.name.trim().to_string(),
            address: dto.address.trim().to_string(),
            city: dto.city.trim().to_string(),
            postal_code: dto.postal_code,
            types: dto.types,
            category: dto.category,
            visit_periodicity: dto.visit_periodicity,
            commission_opinion: dto.commission_opinion,
            last_commission_date: dto.last_commission_date,
            next_commission_date: dto.next_commission_date,
        }
    }
}

/// Request DTO for partially updating an establishment; absent fields are kept
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEstablishmentDto {
    pub grouping_id: Option<Uuid>,

    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 500, message = "Address must be 1-500 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 100, message = "City must not exceed 100 characters"))]
    pub city: Option<String>,

    #[validate(regex(
        path = "*crate::shared::validation::POSTAL_CODE_REGEX",
        message = "Postal code must be five digits"
    ))]
    pub postal_code: Option<String>,

    pub types: Option<Vec<String>>,

    #[validate(length(min = 1, max = 10, message = "Category must not be empty"))]
    pub category: Option<String>,

    #[validate(range(min = 1, max = 120, message = "Visit periodicity must be 1-120 months"))]
    pub visit_periodicity: Option<i32>,

    pub commission_opinion: Option<CommissionOpinion>,
    pub last_commission_date: Option<NaiveDate>,
    pub next_commission_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactResponseDto {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub full_name: String,
    pub role: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<Contact> for ContactResponseDto {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id,
            establishment_id: c.establishment_id,
            full_name: c.full_name,
            role: c.role,
            email: c.email,
            phone: c.phone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateEstablishmentDto {
        serde_json::from_value(serde_json::json!({
            "name": "Lycée Victor Hugo",
            "address": "12 rue des Écoles",
            "city": "Lyon",
            "postal_code": "69003",
            "types": ["R"],
            "category": "2"
        }))
        .unwrap()
    }

    #[test]
    fn test_create_defaults_visit_periodicity() {
        let dto = valid_create();
        assert_eq!(dto.visit_periodicity, DEFAULT_VISIT_PERIODICITY);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_rejects_bad_postal_code() {
        let mut dto = valid_create();
        dto.postal_code = "6900".to_string();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("postal_code"));
    }

    #[test]
    fn test_update_validates_only_present_fields() {
        assert!(UpdateEstablishmentDto::default().validate().is_ok());

        let dto = UpdateEstablishmentDto {
            visit_periodicity: Some(0),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_detail_carries_grouping_when_joined() {
        let now = Utc::now();
        let row = EstablishmentWithGrouping {
            establishment: Establishment {
                id: Uuid::new_v4(),
                grouping_id: Some(Uuid::new_v4()),
                name: "Piscine municipale".to_string(),
                address: "1 avenue du Stade".to_string(),
                city: "Nantes".to_string(),
                postal_code: "44000".to_string(),
                types: vec!["X".to_string()],
                category: "3".to_string(),
                visit_periodicity: 12,
                commission_opinion: Some(CommissionOpinion::Favorable),
                last_commission_date: None,
                next_commission_date: None,
                created_at: now,
                updated_at: now,
            },
            grouping_name: Some("Ville de Nantes".to_string()),
        };

        let dto = EstablishmentDetailDto::from(row);
        assert_eq!(dto.grouping.map(|g| g.name).as_deref(), Some("Ville de Nantes"));
        assert_eq!(
            dto.establishment.commission_opinion_label.as_deref(),
            Some("Favorable")
        );
    }
}
