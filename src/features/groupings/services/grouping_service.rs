use std::collections::HashMap;

use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{db_error, AppError, Result};
use crate::features::groupings::dtos::{
    GroupingDetailDto, GroupingEstablishmentDto, GroupingResponseDto,
};
use crate::features::groupings::models::{EstablishmentVisit, GroupedEstablishment, Grouping};

const SELECT_GROUPED_ESTABLISHMENTS: &str = r#"
    SELECT id, grouping_id, name, types, category, next_commission_date
    FROM establishments
"#;

pub struct GroupingService {
    pool: PgPool,
}

impl GroupingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Groupings by name, each with its establishments
    pub async fn list(&self) -> Result<Vec<GroupingResponseDto>> {
        let groupings = sqlx::query_as::<_, Grouping>("SELECT * FROM groupings ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list groupings"))?;

        if groupings.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = groupings.iter().map(|g| g.id).collect();
        let establishments = sqlx::query_as::<_, GroupedEstablishment>(&format!(
            "{} WHERE grouping_id = ANY($1) ORDER BY name",
            SELECT_GROUPED_ESTABLISHMENTS
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list grouping establishments"))?;

        debug!(
            "Fetched {} groupings with {} establishments",
            groupings.len(),
            establishments.len()
        );
        Ok(assemble(groupings, establishments))
    }

    /// One grouping with its establishments and their visits
    pub async fn get_by_id(&self, id: Uuid) -> Result<GroupingDetailDto> {
        let grouping = sqlx::query_as::<_, Grouping>("SELECT * FROM groupings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to get grouping"))?
            .ok_or_else(|| AppError::NotFound(format!("Grouping {} not found", id)))?;

        let establishments = sqlx::query_as::<_, GroupedEstablishment>(&format!(
            "{} WHERE grouping_id = $1 ORDER BY name",
            SELECT_GROUPED_ESTABLISHMENTS
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list grouping establishments"))?;

        let establishment_ids: Vec<Uuid> = establishments.iter().map(|e| e.id).collect();
        let visits = if establishment_ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as::<_, EstablishmentVisit>(
                r#"
                SELECT id, establishment_id, scheduled_date, visit_type
                FROM visits
                WHERE establishment_id = ANY($1)
                ORDER BY scheduled_date
                "#,
            )
            .bind(&establishment_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list grouping visits"))?
        };

        Ok(GroupingDetailDto::assemble(grouping, establishments, visits))
    }
}

fn assemble(
    groupings: Vec<Grouping>,
    establishments: Vec<GroupedEstablishment>,
) -> Vec<GroupingResponseDto> {
    let mut by_grouping: HashMap<Uuid, Vec<GroupingEstablishmentDto>> = HashMap::new();
    for establishment in establishments {
        by_grouping
            .entry(establishment.grouping_id)
            .or_default()
            .push(establishment.into());
    }

    groupings
        .into_iter()
        .map(|g| {
            let establishments = by_grouping.remove(&g.id).unwrap_or_default();
            GroupingResponseDto::assemble(g, establishments)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn grouping(name: &str) -> Grouping {
        Grouping {
            id: Uuid::new_v4(),
            name: name.to_string(),
            city: None,
            logo_url: None,
            latitude: None,
            longitude: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_establishments_are_keyed_by_grouping() {
        let alpes = grouping("Groupe Alpes");
        let rhone = grouping("Groupe Rhône");
        let establishments = vec![
            GroupedEstablishment {
                id: Uuid::new_v4(),
                grouping_id: rhone.id,
                name: "Collège Jean Moulin".to_string(),
                types: vec!["R".to_string()],
                category: "2".to_string(),
                next_commission_date: None,
            },
            GroupedEstablishment {
                id: Uuid::new_v4(),
                grouping_id: rhone.id,
                name: "Gymnase municipal".to_string(),
                types: vec!["X".to_string()],
                category: "3".to_string(),
                next_commission_date: None,
            },
        ];

        let result = assemble(vec![alpes, rhone], establishments);
        assert_eq!(result[0].name, "Groupe Alpes");
        assert!(result[0].establishments.is_empty());
        let names: Vec<&str> = result[1]
            .establishments
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Collège Jean Moulin", "Gymnase municipal"]);
    }
}
