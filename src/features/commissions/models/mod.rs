mod commission;
mod commission_prescription;

pub use commission::{
    Commission, CommissionCategory, CommissionKind, CommissionOpinion, CommissionPurpose,
    CommissionRow, CommissionStatus, CommissionType, CreateCommission,
};
pub use commission_prescription::{CommissionPrescription, CommissionPrescriptionStatus};
