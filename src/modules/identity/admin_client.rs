use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::token_manager::TokenManager;
use crate::core::error::{AppError, Result};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccountRequest<'a> {
    primary_email: &'a str,
    password: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CreatedAccount {
    pub id: String,
}

/// Account management on the identity provider (Logto-compatible `/api/users`)
pub struct IdentityAdminClient {
    api_base_url: String,
    token_manager: Arc<TokenManager>,
    http_client: reqwest::Client,
}

impl IdentityAdminClient {
    pub fn new(api_base_url: &str, token_manager: Arc<TokenManager>) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            token_manager,
            http_client: reqwest::Client::new(),
        }
    }

    /// Create a sign-in account and return the provider's user id
    pub async fn create_account(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
    ) -> Result<CreatedAccount> {
        let token = self.token_manager.access_token().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to get access token: {}", e))
        })?;

        let url = format!("{}/api/users", self.api_base_url);
        tracing::debug!("Creating identity account: {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token)
            .json(&CreateAccountRequest {
                primary_email: email,
                password,
                name: full_name,
            })
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Failed to reach identity provider: {}", e))
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNPROCESSABLE_ENTITY {
            return Err(AppError::Conflict(format!(
                "An account already exists for {}",
                email
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Identity provider error: HTTP {} - {}", status, body);
            return Err(AppError::ExternalServiceError(format!(
                "Identity provider error: HTTP {}",
                status
            )));
        }

        let account = response.json::<CreatedAccount>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse account response: {}", e))
        })?;

        tracing::info!("Created identity account {}", account.id);
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_uses_management_api_field_names() {
        let body = serde_json::to_value(CreateAccountRequest {
            primary_email: "marie@example.fr",
            password: "ChangeMe123!",
            name: "Marie Curie",
        })
        .unwrap();

        assert_eq!(body["primaryEmail"], "marie@example.fr");
        assert_eq!(body["name"], "Marie Curie");
        assert_eq!(body["password"], "ChangeMe123!");
    }
}
