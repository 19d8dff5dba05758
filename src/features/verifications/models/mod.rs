mod technical_installation;
mod verification;

pub use technical_installation::{RegulationType, TechnicalInstallation};
pub use verification::{VerificationRow, VerificationStatus};
