use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::commissions::dtos::CommissionResponseDto;
use crate::features::establishments::dtos::{ContactResponseDto, EstablishmentDetailDto};
use crate::features::prescriptions::dtos::PrescriptionResponseDto;
use crate::features::regulatory_files::dtos::RegulatoryFileResponseDto;
use crate::features::tasks::dtos::TaskResponseDto;
use crate::features::verifications::dtos::VerificationResponseDto;
use crate::features::visits::dtos::VisitResponseDto;

/// Establishment detail page: the establishment and everything attached to it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EstablishmentOverviewDto {
    pub establishment: EstablishmentDetailDto,
    pub contacts: Vec<ContactResponseDto>,
    pub safety_commissions: Vec<CommissionResponseDto>,
    pub accessibility_commissions: Vec<CommissionResponseDto>,
    pub prescriptions: Vec<PrescriptionResponseDto>,
    pub verifications: Vec<VerificationResponseDto>,
    pub regulatory_files: Vec<RegulatoryFileResponseDto>,
    pub visits: Vec<VisitResponseDto>,
    pub tasks: Vec<TaskResponseDto>,
}
