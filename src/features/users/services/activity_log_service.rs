use sqlx::PgPool;
use tracing::{debug, warn};

use crate::core::error::{db_error, Result};
use crate::features::users::models::ActivityLogRow;

/// Append-only audit trail
pub struct ActivityLogService {
    pool: PgPool,
}

impl ActivityLogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest first, with the author's full name
    pub async fn list(&self, limit: i64) -> Result<Vec<ActivityLogRow>> {
        let rows = sqlx::query_as::<_, ActivityLogRow>(
            r#"
            SELECT l.id, l.user_id, u.full_name AS user_full_name,
                   l.action, l.details, l.created_at
            FROM activity_logs l
            LEFT JOIN users u ON u.id = l.user_id
            ORDER BY l.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list activity logs"))?;

        debug!("Fetched {} activity log rows", rows.len());
        Ok(rows)
    }

    pub async fn log(
        &self,
        user_id: &str,
        action: &str,
        details: Option<&str>,
    ) -> Result<ActivityLogRow> {
        let row = sqlx::query_as::<_, ActivityLogRow>(
            r#"
            WITH inserted AS (
                INSERT INTO activity_logs (user_id, action, details)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT i.id, i.user_id, u.full_name AS user_full_name,
                   i.action, i.details, i.created_at
            FROM inserted i
            LEFT JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(user_id)
        .bind(action)
        .bind(details)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to write activity log"))?;

        debug!("Activity logged: user={}, action={}", user_id, action);
        Ok(row)
    }

    /// Record an administrative action without failing the caller.
    ///
    /// The acting admin may have no `users` row yet (first login), in which
    /// case the foreign key rejects the insert.
    pub async fn record(&self, user_id: &str, action: &str, details: String) {
        if let Err(e) = self.log(user_id, action, Some(&details)).await {
            warn!("Could not record activity '{}' for {}: {}", action, user_id, e);
        }
    }
}
