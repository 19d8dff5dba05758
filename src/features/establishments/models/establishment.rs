use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::commissions::models::CommissionOpinion;

/// Database model for establishment
#[derive(Debug, Clone, FromRow)]
pub struct Establishment {
    pub id: Uuid,
    pub grouping_id: Option<Uuid>,
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    /// ERP type letters, e.g. ["R", "N"]
    pub types: Vec<String>,
    /// ERP category, "1" to "5"
    pub category: String,
    /// Months between consultant visits
    pub visit_periodicity: i32,
    pub commission_opinion: Option<CommissionOpinion>,
    pub last_commission_date: Option<NaiveDate>,
    pub next_commission_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Establishment joined with its grouping name
#[derive(Debug, Clone, FromRow)]
pub struct EstablishmentWithGrouping {
    #[sqlx(flatten)]
    pub establishment: Establishment,
    pub grouping_name: Option<String>,
}

/// Data for creating a new establishment
#[derive(Debug)]
pub struct CreateEstablishment {
    pub grouping_id: Option<Uuid>,
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub types: Vec<String>,
    pub category: String,
    pub visit_periodicity: i32,
    pub commission_opinion: Option<CommissionOpinion>,
    pub last_commission_date: Option<NaiveDate>,
    pub next_commission_date: Option<NaiveDate>,
}
