mod verification_dto;

pub use verification_dto::{
    CreateTechnicalInstallationDto, CreateVerificationDto, TechnicalInstallationDto,
    UpdateVerificationDto, VerificationResponseDto,
};
