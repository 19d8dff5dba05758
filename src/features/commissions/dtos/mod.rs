mod commission_dto;

pub use commission_dto::{
    CommissionKindQuery, CommissionPrescriptionResponseDto, CommissionResponseDto,
    CreateCommissionDto, CreateCommissionPrescriptionDto, UpdateCommissionDto,
    UpdateCommissionPrescriptionDto,
};
