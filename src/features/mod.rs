pub mod auth;
pub mod commissions;
pub mod dashboard;
pub mod establishments;
pub mod files;
pub mod groupings;
pub mod prescriptions;
pub mod regulatory_files;
pub mod tasks;
pub mod users;
pub mod verifications;
pub mod visits;
