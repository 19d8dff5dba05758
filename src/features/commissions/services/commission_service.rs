use std::collections::HashMap;

use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{db_error, AppError, Result};
use crate::features::commissions::dtos::{
    CommissionPrescriptionResponseDto, CommissionResponseDto, CreateCommissionPrescriptionDto,
    UpdateCommissionDto, UpdateCommissionPrescriptionDto,
};
use crate::features::commissions::models::{
    Commission, CommissionKind, CommissionPrescription, CommissionPrescriptionStatus,
    CommissionRow, CreateCommission,
};

const SELECT_COMMISSION_ROWS: &str = r#"
    SELECT c.*,
           e.name AS establishment_name,
           e.address AS establishment_address,
           u.full_name AS responsible_name
    FROM commissions c
    JOIN establishments e ON e.id = c.establishment_id
    LEFT JOIN users u ON u.id = c.responsible_id
"#;

pub struct CommissionService {
    pool: PgPool,
}

impl CommissionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All commissions of a kind, newest first, with nested prescriptions
    pub async fn list(&self, kind: CommissionKind) -> Result<Vec<CommissionResponseDto>> {
        let rows = sqlx::query_as::<_, CommissionRow>(&format!(
            "{} WHERE c.kind = $1 ORDER BY c.date DESC, c.created_at DESC",
            SELECT_COMMISSION_ROWS
        ))
        .bind(kind)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list commissions"))?;

        debug!("Fetched {} {} commissions", rows.len(), kind);
        self.with_prescriptions(rows).await
    }

    pub async fn list_by_establishment(
        &self,
        establishment_id: Uuid,
        kind: CommissionKind,
    ) -> Result<Vec<CommissionResponseDto>> {
        let rows = sqlx::query_as::<_, CommissionRow>(&format!(
            "{} WHERE c.establishment_id = $1 AND c.kind = $2 ORDER BY c.date DESC, c.created_at DESC",
            SELECT_COMMISSION_ROWS
        ))
        .bind(establishment_id)
        .bind(kind)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list establishment commissions"))?;

        self.with_prescriptions(rows).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<CommissionResponseDto> {
        let row = sqlx::query_as::<_, CommissionRow>(&format!(
            "{} WHERE c.id = $1",
            SELECT_COMMISSION_ROWS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get commission"))?
        .ok_or_else(|| AppError::NotFound(format!("Commission {} not found", id)))?;

        self.with_prescriptions(vec![row])
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Commission {} not found", id)))
    }

    /// Load the prescriptions of every row in one query and nest them
    async fn with_prescriptions(
        &self,
        rows: Vec<CommissionRow>,
    ) -> Result<Vec<CommissionResponseDto>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.commission.id).collect();
        let prescriptions = sqlx::query_as::<_, CommissionPrescription>(
            r#"
            SELECT * FROM commission_prescriptions
            WHERE commission_id = ANY($1)
            ORDER BY number
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load commission prescriptions"))?;

        Ok(assemble(rows, prescriptions))
    }

    pub async fn create(&self, data: CreateCommission) -> Result<CommissionResponseDto> {
        let commission = sqlx::query_as::<_, Commission>(
            r#"
            INSERT INTO commissions (
                kind, establishment_id, date, commission_type, purpose, opinion,
                category, status, responsible_id, minutes_received, report_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(data.kind)
        .bind(data.establishment_id)
        .bind(data.date)
        .bind(data.commission_type)
        .bind(data.purpose)
        .bind(data.opinion)
        .bind(data.category)
        .bind(data.status)
        .bind(&data.responsible_id)
        .bind(data.minutes_received)
        .bind(&data.report_url)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create commission"))?;

        info!(
            "Commission created: id={}, kind={}, establishment={}",
            commission.id, commission.kind, commission.establishment_id
        );
        self.get_by_id(commission.id).await
    }

    pub async fn update(&self, id: Uuid, dto: UpdateCommissionDto) -> Result<CommissionResponseDto> {
        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE commissions
            SET date = COALESCE($2, date),
                commission_type = COALESCE($3, commission_type),
                purpose = COALESCE($4, purpose),
                opinion = COALESCE($5, opinion),
                category = COALESCE($6, category),
                status = COALESCE($7, status),
                responsible_id = COALESCE($8, responsible_id),
                minutes_received = COALESCE($9, minutes_received),
                report_url = COALESCE($10, report_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(dto.date)
        .bind(dto.commission_type)
        .bind(dto.purpose)
        .bind(dto.opinion)
        .bind(dto.category)
        .bind(dto.status)
        .bind(dto.responsible_id)
        .bind(dto.minutes_received)
        .bind(dto.report_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update commission"))?;

        if updated.is_none() {
            return Err(AppError::NotFound(format!("Commission {} not found", id)));
        }

        info!("Commission updated: id={}", id);
        self.get_by_id(id).await
    }

    /// Delete a commission; its prescriptions go with it (ON DELETE CASCADE)
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM commissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete commission"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Commission {} not found", id)));
        }

        info!("Commission deleted: id={}", id);
        Ok(())
    }

    pub async fn create_prescription(
        &self,
        commission_id: Uuid,
        dto: CreateCommissionPrescriptionDto,
    ) -> Result<CommissionPrescriptionResponseDto> {
        let prescription = sqlx::query_as::<_, CommissionPrescription>(
            r#"
            INSERT INTO commission_prescriptions (
                commission_id, number, description, reference, status,
                is_urgent, comment, attachment_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(commission_id)
        .bind(dto.number)
        .bind(dto.description.trim())
        .bind(dto.reference.trim())
        .bind(dto.status.unwrap_or(CommissionPrescriptionStatus::ToCorrect))
        .bind(dto.is_urgent)
        .bind(&dto.comment)
        .bind(&dto.attachment_url)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create commission prescription"))?;

        info!(
            "Commission prescription created: id={}, commission={}, number={}",
            prescription.id, commission_id, prescription.number
        );
        Ok(prescription.into())
    }

    pub async fn update_prescription(
        &self,
        id: Uuid,
        dto: UpdateCommissionPrescriptionDto,
    ) -> Result<CommissionPrescriptionResponseDto> {
        let prescription = sqlx::query_as::<_, CommissionPrescription>(
            r#"
            UPDATE commission_prescriptions
            SET number = COALESCE($2, number),
                description = COALESCE($3, description),
                reference = COALESCE($4, reference),
                status = COALESCE($5, status),
                is_urgent = COALESCE($6, is_urgent),
                comment = COALESCE($7, comment),
                attachment_url = COALESCE($8, attachment_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.number)
        .bind(dto.description)
        .bind(dto.reference)
        .bind(dto.status)
        .bind(dto.is_urgent)
        .bind(dto.comment)
        .bind(dto.attachment_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update commission prescription"))?
        .ok_or_else(|| AppError::NotFound(format!("Prescription {} not found", id)))?;

        info!(
            "Commission prescription updated: id={}, status={:?}",
            id, prescription.status
        );
        Ok(prescription.into())
    }

    pub async fn delete_prescription(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM commission_prescriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete commission prescription"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Prescription {} not found", id)));
        }

        info!("Commission prescription deleted: id={}", id);
        Ok(())
    }
}

/// Nest prescriptions under their commission, keeping the row order
fn assemble(
    rows: Vec<CommissionRow>,
    prescriptions: Vec<CommissionPrescription>,
) -> Vec<CommissionResponseDto> {
    let mut by_commission: HashMap<Uuid, Vec<CommissionPrescription>> = HashMap::new();
    for prescription in prescriptions {
        by_commission
            .entry(prescription.commission_id)
            .or_default()
            .push(prescription);
    }

    rows.into_iter()
        .map(|row| {
            let nested = by_commission
                .remove(&row.commission.id)
                .unwrap_or_default();
            CommissionResponseDto::assemble(row, nested)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::commissions::models::{
        CommissionCategory, CommissionOpinion, CommissionPurpose, CommissionStatus,
        CommissionType,
    };
    use chrono::{NaiveDate, Utc};

    fn row(name: &str) -> CommissionRow {
        let now = Utc::now();
        CommissionRow {
            commission: Commission {
                id: Uuid::new_v4(),
                kind: CommissionKind::Accessibility,
                establishment_id: Uuid::new_v4(),
                date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
                commission_type: CommissionType::Departementale,
                purpose: CommissionPurpose::DemandeAvis,
                opinion: CommissionOpinion::Defavorable,
                category: CommissionCategory::Exceptional,
                status: CommissionStatus::InProgress,
                responsible_id: None,
                minutes_received: false,
                report_url: None,
                created_at: now,
                updated_at: now,
            },
            establishment_name: name.to_string(),
            establishment_address: "rue".to_string(),
            responsible_name: None,
        }
    }

    fn prescription(commission_id: Uuid, number: i32) -> CommissionPrescription {
        let now = Utc::now();
        CommissionPrescription {
            id: Uuid::new_v4(),
            commission_id,
            number,
            description: format!("Prescription {}", number),
            reference: String::new(),
            status: CommissionPrescriptionStatus::ToCorrect,
            is_urgent: false,
            comment: None,
            attachment_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_assemble_groups_children_by_parent() {
        let first = row("Mairie");
        let second = row("Gymnase");
        let (first_id, second_id) = (first.commission.id, second.commission.id);

        let result = assemble(
            vec![first, second],
            vec![
                prescription(second_id, 1),
                prescription(first_id, 1),
                prescription(first_id, 2),
            ],
        );

        assert_eq!(result[0].establishment.name, "Mairie");
        assert_eq!(result[0].prescriptions.len(), 2);
        assert_eq!(result[1].prescriptions.len(), 1);
        assert!(result[0].responsible.is_none());
    }

    #[test]
    fn test_assemble_without_children() {
        let result = assemble(vec![row("Mairie")], Vec::new());
        assert!(result[0].prescriptions.is_empty());
    }
}
