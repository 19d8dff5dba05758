use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{db_error, AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::establishments::dtos::UpdateEstablishmentDto;
use crate::features::establishments::models::{
    Contact, CreateEstablishment, Establishment, EstablishmentWithGrouping,
};

const SELECT_WITH_GROUPING: &str = r#"
    SELECT e.*, g.name AS grouping_name
    FROM establishments e
    LEFT JOIN groupings g ON g.id = e.grouping_id
"#;

pub struct EstablishmentService {
    pool: PgPool,
}

impl EstablishmentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Establishments visible to `user`, ordered by name.
    ///
    /// Staff see the whole portfolio; clients only what they were granted.
    pub async fn list(&self, user: &AuthenticatedUser) -> Result<Vec<Establishment>> {
        let establishments = if user.is_staff() {
            sqlx::query_as::<_, Establishment>("SELECT * FROM establishments ORDER BY name")
                .fetch_all(&self.pool)
                .await
        } else {
            sqlx::query_as::<_, Establishment>(
                r#"
                SELECT e.*
                FROM establishments e
                JOIN user_establishment_access a ON a.establishment_id = e.id
                WHERE a.user_id = $1
                ORDER BY e.name
                "#,
            )
            .bind(&user.sub)
            .fetch_all(&self.pool)
            .await
        }
        .map_err(db_error("Failed to list establishments"))?;

        debug!("Listed {} establishments for {}", establishments.len(), user.sub);
        Ok(establishments)
    }

    /// Fail with `NotFound` unless `user` may see the establishment
    pub async fn ensure_access(&self, user: &AuthenticatedUser, id: Uuid) -> Result<()> {
        if user.is_staff() {
            return Ok(());
        }

        let granted = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM user_establishment_access
                WHERE user_id = $1 AND establishment_id = $2
            )
            "#,
        )
        .bind(&user.sub)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to check establishment access"))?;

        if granted {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Establishment {} not found", id)))
        }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<EstablishmentWithGrouping> {
        sqlx::query_as::<_, EstablishmentWithGrouping>(&format!(
            "{} WHERE e.id = $1",
            SELECT_WITH_GROUPING
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get establishment"))?
        .ok_or_else(|| AppError::NotFound(format!("Establishment {} not found", id)))
    }

    pub async fn create(&self, data: CreateEstablishment) -> Result<Establishment> {
        let establishment = sqlx::query_as::<_, Establishment>(
            r#"
            INSERT INTO establishments (
                grouping_id, name, address, city, postal_code, types, category,
                visit_periodicity, commission_opinion, last_commission_date, next_commission_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(data.grouping_id)
        .bind(&data.name)
        .bind(&data.address)
        .bind(&data.city)
        .bind(&data.postal_code)
        .bind(&data.types)
        .bind(&data.category)
        .bind(data.visit_periodicity)
        .bind(data.commission_opinion)
        .bind(data.last_commission_date)
        .bind(data.next_commission_date)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create establishment"))?;

        info!("Establishment created: id={}, name={}", establishment.id, establishment.name);
        Ok(establishment)
    }

    /// Apply a partial update and return the row joined with its grouping
    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateEstablishmentDto,
    ) -> Result<EstablishmentWithGrouping> {
        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE establishments
            SET grouping_id = COALESCE($2, grouping_id),
                name = COALESCE($3, name),
                address = COALESCE($4, address),
                city = COALESCE($5, city),
                postal_code = COALESCE($6, postal_code),
                types = COALESCE($7, types),
                category = COALESCE($8, category),
                visit_periodicity = COALESCE($9, visit_periodicity),
                commission_opinion = COALESCE($10, commission_opinion),
                last_commission_date = COALESCE($11, last_commission_date),
                next_commission_date = COALESCE($12, next_commission_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(dto.grouping_id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.address.as_deref().map(str::trim))
        .bind(dto.city.as_deref().map(str::trim))
        .bind(dto.postal_code)
        .bind(dto.types)
        .bind(dto.category)
        .bind(dto.visit_periodicity)
        .bind(dto.commission_opinion)
        .bind(dto.last_commission_date)
        .bind(dto.next_commission_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update establishment"))?;

        if updated.is_none() {
            return Err(AppError::NotFound(format!("Establishment {} not found", id)));
        }

        info!("Establishment updated: id={}", id);
        self.get_by_id(id).await
    }

    pub async fn list_contacts(&self, establishment_id: Uuid) -> Result<Vec<Contact>> {
        sqlx::query_as::<_, Contact>(
            "SELECT * FROM contacts WHERE establishment_id = $1 ORDER BY full_name",
        )
        .bind(establishment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list contacts"))
    }
}
