use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::users::models::ActivityLogRow;
use crate::shared::constants::{DEFAULT_ACTIVITY_LOG_LIMIT, MAX_ACTIVITY_LOG_LIMIT};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityLogResponseDto {
    pub id: Uuid,
    pub user_id: String,
    pub user_full_name: Option<String>,
    pub action: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityLogRow> for ActivityLogResponseDto {
    fn from(row: ActivityLogRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            user_full_name: row.user_full_name,
            action: row.action,
            details: row.details,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ActivityLogQuery {
    /// Number of rows, 1-500 (default 50)
    pub limit: Option<i64>,
}

impl ActivityLogQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_ACTIVITY_LOG_LIMIT)
            .clamp(1, MAX_ACTIVITY_LOG_LIMIT)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateActivityLogDto {
    #[validate(length(min = 1, max = 100, message = "Action must be 1-100 characters"))]
    pub action: String,
    #[validate(length(max = 2000, message = "Details must not exceed 2000 characters"))]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_defaults_and_clamps() {
        assert_eq!(ActivityLogQuery::default().effective_limit(), 50);
        assert_eq!(ActivityLogQuery { limit: Some(10) }.effective_limit(), 10);
        assert_eq!(ActivityLogQuery { limit: Some(10_000) }.effective_limit(), 500);
        assert_eq!(ActivityLogQuery { limit: Some(0) }.effective_limit(), 1);
    }
}
