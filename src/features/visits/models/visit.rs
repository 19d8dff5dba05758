use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::types::BadgeVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "visit_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VisitType {
    FirstVisit,
    SecondVisit,
    Commission,
    Reminder,
}

impl VisitType {
    pub fn label(&self) -> &'static str {
        match self {
            VisitType::FirstVisit => "Première visite",
            VisitType::SecondVisit => "Seconde visite",
            VisitType::Commission => "Commission",
            VisitType::Reminder => "Visite de rappel",
        }
    }

    /// Compact label for table cells
    pub fn short_label(&self) -> &'static str {
        match self {
            VisitType::FirstVisit => "1ère visite",
            VisitType::SecondVisit => "2ème visite",
            VisitType::Commission => "Commission",
            VisitType::Reminder => "Rappel",
        }
    }

    pub fn badge(&self) -> BadgeVariant {
        match self {
            VisitType::FirstVisit => BadgeVariant::Default,
            VisitType::SecondVisit => BadgeVariant::Secondary,
            VisitType::Commission => BadgeVariant::Destructive,
            VisitType::Reminder => BadgeVariant::Outline,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Visit {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub scheduled_date: DateTime<Utc>,
    pub visit_type: VisitType,
    pub consultant_id: Option<String>,
    pub notes: Option<String>,
    pub report_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Visit joined with its establishment and consultant
#[derive(Debug, Clone, FromRow)]
pub struct VisitRow {
    #[sqlx(flatten)]
    pub visit: Visit,
    pub establishment_name: String,
    pub establishment_address: String,
    pub consultant_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_type_presentation() {
        let all = [
            VisitType::FirstVisit,
            VisitType::SecondVisit,
            VisitType::Commission,
            VisitType::Reminder,
        ];
        let short: Vec<&str> = all.iter().map(|t| t.short_label()).collect();
        assert_eq!(short, vec!["1ère visite", "2ème visite", "Commission", "Rappel"]);
        assert_eq!(VisitType::Reminder.label(), "Visite de rappel");
        assert_eq!(VisitType::Commission.badge(), BadgeVariant::Destructive);
    }
}
