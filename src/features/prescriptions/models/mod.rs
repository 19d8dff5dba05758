mod prescription;

pub use prescription::{PrescriptionRow, PrescriptionSource, PrescriptionStatus};
