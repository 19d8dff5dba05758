use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::visits::models::VisitType;

#[derive(Debug, Clone, FromRow)]
pub struct Grouping {
    pub id: Uuid,
    pub name: String,
    pub city: Option<String>,
    pub logo_url: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Establishment columns shown under a grouping
#[derive(Debug, Clone, FromRow)]
pub struct GroupedEstablishment {
    pub id: Uuid,
    pub grouping_id: Uuid,
    pub name: String,
    pub types: Vec<String>,
    pub category: String,
    pub next_commission_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, FromRow)]
pub struct EstablishmentVisit {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub scheduled_date: DateTime<Utc>,
    pub visit_type: VisitType,
}
