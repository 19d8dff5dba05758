use std::collections::HashMap;
use std::sync::Arc;

use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{db_error, AppError, Result};
use crate::features::establishments::dtos::EstablishmentSummaryDto;
use crate::features::users::dtos::{CreateUserDto, UpdateUserDto, UserOptionDto, UserResponseDto};
use crate::features::users::models::{EstablishmentGrant, User, UserRole};
use crate::features::users::services::ActivityLogService;
use crate::modules::identity::IdentityAdminClient;

pub struct UserService {
    pool: PgPool,
    identity: Arc<IdentityAdminClient>,
    activity: Arc<ActivityLogService>,
    temporary_password: String,
}

impl UserService {
    pub fn new(
        pool: PgPool,
        identity: Arc<IdentityAdminClient>,
        activity: Arc<ActivityLogService>,
        temporary_password: String,
    ) -> Self {
        Self {
            pool,
            identity,
            activity,
            temporary_password,
        }
    }

    /// All users ordered by name, each with their establishment grants
    pub async fn list(&self) -> Result<Vec<UserResponseDto>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY full_name")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list users"))?;

        let ids: Vec<String> = users.iter().map(|u| u.id.clone()).collect();
        let mut grants = self.grants_by_user(&ids).await?;

        debug!("Fetched {} users", users.len());
        Ok(users
            .into_iter()
            .map(|user| {
                let establishments = grants.remove(&user.id).unwrap_or_default();
                UserResponseDto::assemble(user, establishments)
            })
            .collect())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<UserResponseDto> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to get user"))?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        let mut grants = self.grants_by_user(&[user.id.clone()]).await?;
        let establishments = grants.remove(&user.id).unwrap_or_default();
        Ok(UserResponseDto::assemble(user, establishments))
    }

    async fn grants_by_user(
        &self,
        user_ids: &[String],
    ) -> Result<HashMap<String, Vec<EstablishmentSummaryDto>>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let grants = sqlx::query_as::<_, EstablishmentGrant>(
            r#"
            SELECT a.user_id, e.id AS establishment_id, e.name AS establishment_name
            FROM user_establishment_access a
            JOIN establishments e ON e.id = a.establishment_id
            WHERE a.user_id = ANY($1)
            ORDER BY e.name
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load establishment grants"))?;

        Ok(group_grants(grants))
    }

    /// Users with the consultant role, for visit planning
    pub async fn list_consultants(&self) -> Result<Vec<UserOptionDto>> {
        self.list_by_roles(&[UserRole::Consultant]).await
    }

    /// Users a task can be assigned to
    pub async fn list_assignees(&self) -> Result<Vec<UserOptionDto>> {
        self.list_by_roles(&[UserRole::Admin, UserRole::Consultant])
            .await
    }

    async fn list_by_roles(&self, roles: &[UserRole]) -> Result<Vec<UserOptionDto>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = ANY($1) ORDER BY full_name",
        )
        .bind(roles)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list users by role"))?;

        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Create the sign-in account, then the local user and its grants.
    ///
    /// The account is created with the configured temporary password; the
    /// user changes it on first sign-in.
    pub async fn create(&self, actor_id: &str, dto: CreateUserDto) -> Result<UserResponseDto> {
        let email = dto.email.trim().to_lowercase();
        let full_name = dto.full_name.trim().to_string();

        let account = self
            .identity
            .create_account(&email, &full_name, &self.temporary_password)
            .await?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        sqlx::query(
            r#"
            INSERT INTO users (id, email, full_name, phone, role)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&account.id)
        .bind(&email)
        .bind(&full_name)
        .bind(&dto.phone)
        .bind(dto.role)
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to create user"))?;

        if !dto.establishment_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO user_establishment_access (user_id, establishment_id)
                SELECT $1, UNNEST($2::uuid[])
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(&account.id)
            .bind(&dto.establishment_ids)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to grant establishment access"))?;
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit user creation"))?;

        info!("User created: id={}, role={:?}", account.id, dto.role);
        self.activity
            .record(actor_id, "user_created", format!("{} ({})", full_name, email))
            .await;

        self.get_by_id(&account.id).await
    }

    pub async fn update(
        &self,
        actor_id: &str,
        id: &str,
        dto: UpdateUserDto,
    ) -> Result<UserResponseDto> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                role = COALESCE($4, role),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.full_name.as_deref().map(str::trim))
        .bind(&dto.phone)
        .bind(dto.role)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update user"))?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        info!("User updated: id={}", id);
        self.activity
            .record(actor_id, "user_updated", user.full_name.clone())
            .await;

        self.get_by_id(id).await
    }

    pub async fn grant_access(
        &self,
        actor_id: &str,
        user_id: &str,
        establishment_id: Uuid,
    ) -> Result<UserResponseDto> {
        sqlx::query(
            r#"
            INSERT INTO user_establishment_access (user_id, establishment_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(user_id)
        .bind(establishment_id)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to grant establishment access"))?;

        info!(
            "Access granted: user={}, establishment={}",
            user_id, establishment_id
        );
        self.activity
            .record(
                actor_id,
                "access_granted",
                format!("{} -> {}", user_id, establishment_id),
            )
            .await;

        self.get_by_id(user_id).await
    }

    pub async fn revoke_access(
        &self,
        actor_id: &str,
        user_id: &str,
        establishment_id: Uuid,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_establishment_access
            WHERE user_id = $1 AND establishment_id = $2
            "#,
        )
        .bind(user_id)
        .bind(establishment_id)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to revoke establishment access"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "User {} has no access to establishment {}",
                user_id, establishment_id
            )));
        }

        info!(
            "Access revoked: user={}, establishment={}",
            user_id, establishment_id
        );
        self.activity
            .record(
                actor_id,
                "access_revoked",
                format!("{} -> {}", user_id, establishment_id),
            )
            .await;

        Ok(())
    }
}

fn group_grants(grants: Vec<EstablishmentGrant>) -> HashMap<String, Vec<EstablishmentSummaryDto>> {
    let mut by_user: HashMap<String, Vec<EstablishmentSummaryDto>> = HashMap::new();
    for grant in grants {
        by_user
            .entry(grant.user_id)
            .or_default()
            .push(EstablishmentSummaryDto::new(
                grant.establishment_id,
                grant.establishment_name,
            ));
    }
    by_user
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(user_id: &str, name: &str) -> EstablishmentGrant {
        EstablishmentGrant {
            user_id: user_id.to_string(),
            establishment_id: Uuid::new_v4(),
            establishment_name: name.to_string(),
        }
    }

    #[test]
    fn test_grants_are_grouped_by_user_in_order() {
        let grouped = group_grants(vec![
            grant("u1", "Crèche Les Lutins"),
            grant("u2", "Piscine municipale"),
            grant("u1", "Salle des fêtes"),
        ]);

        let names: Vec<&str> = grouped["u1"].iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Crèche Les Lutins", "Salle des fêtes"]);
        assert_eq!(grouped["u2"].len(), 1);
        assert!(!grouped.contains_key("u3"));
    }
}
