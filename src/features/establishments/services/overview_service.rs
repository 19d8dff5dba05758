use futures::try_join;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::commissions::models::CommissionKind;
use crate::features::commissions::CommissionService;
use crate::features::establishments::dtos::{ContactResponseDto, EstablishmentOverviewDto};
use crate::features::establishments::services::EstablishmentService;
use crate::features::prescriptions::PrescriptionService;
use crate::features::regulatory_files::RegulatoryFileService;
use crate::features::tasks::TaskService;
use crate::features::verifications::VerificationService;
use crate::features::visits::VisitService;

/// Composes the establishment detail page from the per-feature services
pub struct OverviewService {
    establishments: EstablishmentService,
    commissions: CommissionService,
    prescriptions: PrescriptionService,
    verifications: VerificationService,
    regulatory_files: RegulatoryFileService,
    visits: VisitService,
    tasks: TaskService,
}

impl OverviewService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            establishments: EstablishmentService::new(pool.clone()),
            commissions: CommissionService::new(pool.clone()),
            prescriptions: PrescriptionService::new(pool.clone()),
            verifications: VerificationService::new(pool.clone()),
            regulatory_files: RegulatoryFileService::new(pool.clone()),
            visits: VisitService::new(pool.clone()),
            tasks: TaskService::new(pool),
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<EstablishmentOverviewDto> {
        let establishment = self.establishments.get_by_id(id).await?;

        let (
            contacts,
            safety_commissions,
            accessibility_commissions,
            prescriptions,
            verifications,
            regulatory_files,
            visits,
            tasks,
        ) = try_join!(
            self.establishments.list_contacts(id),
            self.commissions
                .list_by_establishment(id, CommissionKind::Safety),
            self.commissions
                .list_by_establishment(id, CommissionKind::Accessibility),
            self.prescriptions.list_by_establishment(id),
            self.verifications.list_by_establishment(id),
            self.regulatory_files.list_by_establishment(id),
            self.visits.list_by_establishment(id),
            self.tasks.list_by_establishment(id),
        )?;

        debug!(
            "Overview of establishment {}: {} commissions, {} prescriptions, {} visits, {} tasks",
            id,
            safety_commissions.len() + accessibility_commissions.len(),
            prescriptions.len(),
            visits.len(),
            tasks.len()
        );

        Ok(EstablishmentOverviewDto {
            establishment: establishment.into(),
            contacts: contacts.into_iter().map(ContactResponseDto::from).collect(),
            safety_commissions,
            accessibility_commissions,
            prescriptions,
            verifications,
            regulatory_files,
            visits,
            tasks,
        })
    }
}
