//! Users, their establishment grants and the activity log.
//!
//! Accounts live on the identity provider; `users.id` is the provider's id,
//! which is also the `sub` claim of access tokens.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::{ActivityLogService, UserService};
