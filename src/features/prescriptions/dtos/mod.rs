mod prescription_dto;

pub use prescription_dto::{
    CommissionRefDto, CreatePrescriptionDto, PrescriptionResponseDto, UpdatePrescriptionDto,
};
