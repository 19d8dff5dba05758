use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Activity log row joined with the author's name
#[derive(Debug, Clone, FromRow)]
pub struct ActivityLogRow {
    pub id: Uuid,
    pub user_id: String,
    pub user_full_name: Option<String>,
    pub action: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}
