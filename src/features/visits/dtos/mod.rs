mod visit_dto;
mod visit_report_dto;

pub use visit_dto::{CreateVisitDto, UpdateVisitDto, VisitResponseDto};
pub use visit_report_dto::{
    ChecklistItemDto, ReportContactDto, ReportEstablishmentDto, VisitReportDto,
    VisitReportRequestDto,
};
