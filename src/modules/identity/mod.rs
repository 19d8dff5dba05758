//! Identity provider management API (account creation for new users).

mod admin_client;
mod token_manager;

pub use admin_client::IdentityAdminClient;
pub use token_manager::TokenManager;
