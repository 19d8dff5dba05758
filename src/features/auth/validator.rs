use super::jwks::JwksClient;
use super::model::{AuthenticatedUser, CustomClaims};
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    leeway: u64,
}

/// Claims we read after `jsonwebtoken` has checked iss/aud/exp/nbf
#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    /// Logto marks access tokens with `kind`; other issuers omit it
    #[serde(default)]
    kind: Option<String>,
    #[serde(rename = "sessionUid", default)]
    session_uid: Option<String>,
    /// Namespace under which the identity provider injects application roles
    #[serde(rename = "https://firesafe.pro/claims", default)]
    custom_claims: Option<CustomClaims>,
}

impl Claims {
    fn into_user(self) -> Result<AuthenticatedUser, AppError> {
        if let Some(kind) = &self.kind {
            if kind != "AccessToken" {
                return Err(AppError::Auth("Token is not an access token".to_string()));
            }
        }

        Ok(AuthenticatedUser {
            sub: self.sub,
            email: self.email,
            session_uid: self.session_uid,
            roles: self.custom_claims.map(|c| c.roles).unwrap_or_default(),
        })
    }
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        leeway: Duration,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            leeway: leeway.as_secs(),
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only RS256 is allowed",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;

        let decoding_key = self
            .jwks_client
            .get_key(&kid)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        token_data.claims.into_user()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(value: serde_json::Value) -> Claims {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_roles_are_read_from_namespace() {
        let user = claims(serde_json::json!({
            "sub": "user-1",
            "email": "marie@example.fr",
            "https://firesafe.pro/claims": { "roles": ["consultant"] }
        }))
        .into_user()
        .unwrap();

        assert_eq!(user.sub, "user-1");
        assert_eq!(user.roles, vec!["consultant".to_string()]);
        assert!(user.is_staff());
    }

    #[test]
    fn test_missing_custom_claims_means_no_roles() {
        let user = claims(serde_json::json!({ "sub": "user-2" }))
            .into_user()
            .unwrap();
        assert!(user.roles.is_empty());
    }

    #[test]
    fn test_non_access_tokens_are_rejected() {
        let result = claims(serde_json::json!({ "sub": "user-3", "kind": "IdToken" })).into_user();
        assert!(matches!(result, Err(AppError::Auth(_))));
    }
}
