mod establishment_dto;
mod overview_dto;

pub use establishment_dto::{
    ContactResponseDto, CreateEstablishmentDto, EstablishmentDetailDto, EstablishmentResponseDto,
    EstablishmentSummaryDto, GroupingRefDto, UpdateEstablishmentDto,
};
pub use overview_dto::EstablishmentOverviewDto;
