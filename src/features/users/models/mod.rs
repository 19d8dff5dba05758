mod activity_log;
mod user;

pub use activity_log::ActivityLogRow;
pub use user::{EstablishmentGrant, User, UserRole};
