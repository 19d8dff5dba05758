mod grouping_dto;

pub use grouping_dto::{
    GroupingDetailDto, GroupingEstablishmentDto, GroupingEstablishmentVisitsDto,
    GroupingResponseDto, VisitSlotDto,
};
