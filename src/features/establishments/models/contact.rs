use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// On-site contact person of an establishment
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct Contact {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub full_name: String,
    pub role: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
