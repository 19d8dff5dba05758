//! Bearer-token authentication against the external OIDC issuer and
//! role guards for handlers.

mod jwks;
mod validator;

pub mod guards;
pub mod model;

pub use jwks::JwksClient;
pub use validator::JwtValidator;
