use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::core::config::IdentityAdminConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

struct CachedToken {
    token: TokenResponse,
    fetched_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self, margin: Duration) -> bool {
        self.fetched_at.elapsed() + margin < Duration::from_secs(self.token.expires_in)
    }
}

/// Client-credentials token for the identity provider's management API,
/// cached until shortly before it expires.
pub struct TokenManager {
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
    resource: String,
    client: reqwest::Client,
    cache: RwLock<Option<CachedToken>>,
    refresh_margin: Duration,
}

impl TokenManager {
    pub fn new(config: &IdentityAdminConfig) -> Self {
        Self {
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.scope.clone(),
            resource: config.resource.clone(),
            client: reqwest::Client::new(),
            cache: RwLock::new(None),
            refresh_margin: Duration::from_secs(60),
        }
    }

    pub async fn access_token(&self) -> Result<String, TokenError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref().filter(|c| c.is_fresh(self.refresh_margin)) {
                tracing::debug!("Using cached management API token");
                return Ok(cached.token.access_token.clone());
            }
        }

        self.fetch_token().await
    }

    async fn fetch_token(&self) -> Result<String, TokenError> {
        tracing::debug!("Fetching management API token from {}", self.token_url);

        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", self.scope.as_str()),
                ("resource", self.resource.as_str()),
            ])
            .send()
            .await
            .map_err(|e| TokenError::FetchError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TokenError::FetchError(format!(
                "Token request failed: HTTP {} - {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| TokenError::ParseError(e.to_string()))?;

        tracing::info!(
            "Fetched management API token, expires in {} seconds",
            token.expires_in
        );

        let access_token = token.access_token.clone();
        *self.cache.write().await = Some(CachedToken {
            token,
            fetched_at: Instant::now(),
        });

        Ok(access_token)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Failed to fetch token: {0}")]
    FetchError(String),

    #[error("Failed to parse token response: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cached(expires_in: u64) -> CachedToken {
        CachedToken {
            token: TokenResponse {
                access_token: "t".to_string(),
                expires_in,
            },
            fetched_at: Instant::now(),
        }
    }

    #[test]
    fn test_token_is_refreshed_inside_margin() {
        let margin = Duration::from_secs(60);
        assert!(cached(3600).is_fresh(margin));
        assert!(!cached(30).is_fresh(margin));
    }
}
