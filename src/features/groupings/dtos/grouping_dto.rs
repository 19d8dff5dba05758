use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::groupings::models::{EstablishmentVisit, GroupedEstablishment, Grouping};
use crate::features::visits::models::VisitType;
use crate::shared::types::BadgeVariant;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupingEstablishmentDto {
    pub id: Uuid,
    pub name: String,
    pub types: Vec<String>,
    pub category: String,
    pub next_commission_date: Option<NaiveDate>,
}

impl From<GroupedEstablishment> for GroupingEstablishmentDto {
    fn from(e: GroupedEstablishment) -> Self {
        Self {
            id: e.id,
            name: e.name,
            types: e.types,
            category: e.category,
            next_commission_date: e.next_commission_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupingResponseDto {
    pub id: Uuid,
    pub name: String,
    pub city: Option<String>,
    pub logo_url: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub establishments: Vec<GroupingEstablishmentDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GroupingResponseDto {
    pub fn assemble(g: Grouping, establishments: Vec<GroupingEstablishmentDto>) -> Self {
        Self {
            id: g.id,
            name: g.name,
            city: g.city,
            logo_url: g.logo_url,
            latitude: g.latitude,
            longitude: g.longitude,
            establishments,
            created_at: g.created_at,
            updated_at: g.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisitSlotDto {
    pub id: Uuid,
    pub scheduled_date: DateTime<Utc>,
    pub visit_type: VisitType,
    pub visit_type_label: String,
    pub visit_type_badge: BadgeVariant,
}

impl From<EstablishmentVisit> for VisitSlotDto {
    fn from(v: EstablishmentVisit) -> Self {
        Self {
            id: v.id,
            scheduled_date: v.scheduled_date,
            visit_type_label: v.visit_type.short_label().to_string(),
            visit_type_badge: v.visit_type.badge(),
            visit_type: v.visit_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupingEstablishmentVisitsDto {
    #[serde(flatten)]
    pub establishment: GroupingEstablishmentDto,
    pub visits: Vec<VisitSlotDto>,
}

/// A grouping with its establishments and their visits
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupingDetailDto {
    pub id: Uuid,
    pub name: String,
    pub city: Option<String>,
    pub logo_url: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub establishments: Vec<GroupingEstablishmentVisitsDto>,
}

impl GroupingDetailDto {
    pub fn assemble(
        g: Grouping,
        establishments: Vec<GroupedEstablishment>,
        visits: Vec<EstablishmentVisit>,
    ) -> Self {
        let mut by_establishment: HashMap<Uuid, Vec<VisitSlotDto>> = HashMap::new();
        for visit in visits {
            by_establishment
                .entry(visit.establishment_id)
                .or_default()
                .push(visit.into());
        }

        let establishments = establishments
            .into_iter()
            .map(|e| GroupingEstablishmentVisitsDto {
                visits: by_establishment.remove(&e.id).unwrap_or_default(),
                establishment: e.into(),
            })
            .collect();

        Self {
            id: g.id,
            name: g.name,
            city: g.city,
            logo_url: g.logo_url,
            latitude: g.latitude,
            longitude: g.longitude,
            establishments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouping() -> Grouping {
        Grouping {
            id: Uuid::new_v4(),
            name: "Groupe Alpes".to_string(),
            city: Some("Annecy".to_string()),
            logo_url: None,
            latitude: Some(Decimal::new(45_899_247, 6)),
            longitude: Some(Decimal::new(6_129_384, 6)),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn establishment(grouping_id: Uuid, name: &str) -> GroupedEstablishment {
        GroupedEstablishment {
            id: Uuid::new_v4(),
            grouping_id,
            name: name.to_string(),
            types: vec!["O".to_string()],
            category: "3".to_string(),
            next_commission_date: None,
        }
    }

    #[test]
    fn test_visits_are_attached_to_their_establishment() {
        let g = grouping();
        let lac = establishment(g.id, "Hôtel du Lac");
        let parc = establishment(g.id, "Résidence du Parc");
        let visits = vec![
            EstablishmentVisit {
                id: Uuid::new_v4(),
                establishment_id: lac.id,
                scheduled_date: Utc::now(),
                visit_type: VisitType::FirstVisit,
            },
            EstablishmentVisit {
                id: Uuid::new_v4(),
                establishment_id: lac.id,
                scheduled_date: Utc::now(),
                visit_type: VisitType::Reminder,
            },
        ];

        let detail = GroupingDetailDto::assemble(g, vec![lac, parc], visits);
        assert_eq!(detail.establishments.len(), 2);
        assert_eq!(detail.establishments[0].visits.len(), 2);
        assert_eq!(detail.establishments[0].visits[1].visit_type_label, "Rappel");
        assert!(detail.establishments[1].visits.is_empty());
    }
}
