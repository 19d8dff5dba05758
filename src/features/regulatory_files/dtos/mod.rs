mod regulatory_file_dto;

pub use regulatory_file_dto::{
    CreateRegulatoryFileDto, RegulatoryFileResponseDto, UpdateRegulatoryFileDto,
};
