use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{db_error, AppError, Result};
use crate::features::visits::dtos::{VisitReportDto, VisitReportRequestDto};
use crate::features::visits::models::{ConsultantInfo, VisitReport};
use crate::features::visits::report::{layout, PdfRenderer};
use crate::modules::storage::{put_then_record, ObjectStore};

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A rendered report, ready to be sent back as a download
pub struct GeneratedReport {
    pub file_name: String,
    pub pdf: Vec<u8>,
    pub report: VisitReportDto,
}

pub struct VisitReportService {
    pool: PgPool,
    store: Arc<dyn ObjectStore>,
    renderer: Arc<PdfRenderer>,
}

impl VisitReportService {
    pub fn new(pool: PgPool, store: Arc<dyn ObjectStore>, renderer: Arc<PdfRenderer>) -> Self {
        Self {
            pool,
            store,
            renderer,
        }
    }

    /// Render, upload and record a visit report.
    ///
    /// Every call produces a new object and a new metadata row.
    pub async fn generate(
        &self,
        visit_id: Uuid,
        request: VisitReportRequestDto,
    ) -> Result<GeneratedReport> {
        let consultant = self.find_consultant(&request.consultant_id).await?;
        self.ensure_visit_exists(visit_id).await?;

        let report_date = Utc::now();
        let layout = layout::layout(&request, &consultant, report_date.date_naive());
        debug!(
            "Visit report for {} laid out on {} page(s)",
            visit_id,
            layout.page_count()
        );

        let renderer = Arc::clone(&self.renderer);
        let pdf = tokio::task::spawn_blocking(move || renderer.render(&layout))
            .await
            .map_err(|e| AppError::Internal(format!("Report rendering task failed: {}", e)))??;

        let file_name = new_report_file_name(&request.establishment.name, request.visit_date);
        let file_path = format!("visit_reports/{}/{}", request.establishment_id, file_name);
        let key = self.store.public_key(&file_path);
        let url = self.store.public_url(&key);

        let report = put_then_record(
            self.store.as_ref(),
            &key,
            pdf.clone(),
            PDF_CONTENT_TYPE,
            || self.record(visit_id, &request, &url, &file_path, report_date),
        )
        .await?;

        info!(
            "Visit report generated: visit={}, report={}, size={} bytes",
            visit_id,
            report.id,
            pdf.len()
        );

        Ok(GeneratedReport {
            file_name,
            pdf,
            report: report.into(),
        })
    }

    async fn find_consultant(&self, consultant_id: &str) -> Result<ConsultantInfo> {
        sqlx::query_as::<_, ConsultantInfo>(
            "SELECT full_name, email, phone FROM users WHERE id = $1",
        )
        .bind(consultant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get consultant"))?
        .ok_or_else(|| AppError::NotFound(format!("Consultant {} not found", consultant_id)))
    }

    async fn ensure_visit_exists(&self, visit_id: Uuid) -> Result<()> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM visits WHERE id = $1)")
            .bind(visit_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to check visit"))?;

        if !exists {
            return Err(AppError::NotFound(format!("Visit {} not found", visit_id)));
        }
        Ok(())
    }

    /// Metadata row and the visit's report link, committed together
    async fn record(
        &self,
        visit_id: Uuid,
        request: &VisitReportRequestDto,
        url: &str,
        file_path: &str,
        report_date: DateTime<Utc>,
    ) -> Result<VisitReport> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let report = sqlx::query_as::<_, VisitReport>(
            r#"
            INSERT INTO visit_reports
                (visit_id, establishment_id, consultant_id, report_url, report_date, report_type, file_path)
            VALUES ($1, $2, $3, $4, $5, 'visit', $6)
            RETURNING *
            "#,
        )
        .bind(visit_id)
        .bind(request.establishment_id)
        .bind(&request.consultant_id)
        .bind(url)
        .bind(report_date)
        .bind(file_path)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to save visit report"))?;

        sqlx::query("UPDATE visits SET report_url = $2, updated_at = NOW() WHERE id = $1")
            .bind(visit_id)
            .bind(url)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to link report to visit"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit visit report"))?;

        Ok(report)
    }
}

/// `Rapport_Visite_{name}_{yyyy-mm-dd}_{suffix}.pdf`
pub fn report_file_name(establishment_name: &str, visit_date: NaiveDate, suffix: &str) -> String {
    let name = establishment_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .replace('/', "-");
    format!(
        "Rapport_Visite_{}_{}_{}.pdf",
        name,
        visit_date.format("%Y-%m-%d"),
        suffix
    )
}

fn new_report_file_name(establishment_name: &str, visit_date: NaiveDate) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    report_file_name(establishment_name, visit_date, &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 12).unwrap()
    }

    #[test]
    fn test_whitespace_runs_become_underscores() {
        assert_eq!(
            report_file_name("Hôtel   du\tLac", visit_date(), "a1b2c3d4"),
            "Rapport_Visite_Hôtel_du_Lac_2026-03-12_a1b2c3d4.pdf"
        );
    }

    #[test]
    fn test_slashes_cannot_escape_the_report_folder() {
        let name = report_file_name("Bâtiment A/B", visit_date(), "a1b2c3d4");
        assert!(!name.contains('/'));
    }

    #[test]
    fn test_identical_input_gives_independent_artifacts() {
        let first = new_report_file_name("Hôtel du Lac", visit_date());
        let second = new_report_file_name("Hôtel du Lac", visit_date());

        assert_ne!(first, second);
        for name in [&first, &second] {
            assert!(name.starts_with("Rapport_Visite_Hôtel_du_Lac_2026-03-12_"));
            assert!(name.ends_with(".pdf"));
        }
    }
}
