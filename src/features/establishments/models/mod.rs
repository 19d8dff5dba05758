mod contact;
mod establishment;

pub use contact::Contact;
pub use establishment::{CreateEstablishment, Establishment, EstablishmentWithGrouping};
