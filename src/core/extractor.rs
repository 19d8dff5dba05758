use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;

/// JSON body extractor that rejects malformed bodies with the standard error
/// envelope and runs `validator` rules before the handler sees the value.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection_response)?;

        value
            .validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(Self(value))
    }
}

fn json_rejection_response(rejection: JsonRejection) -> Response {
    let message = match rejection {
        JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
        JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
        JsonRejection::MissingJsonContentType(err) => {
            format!("Missing JSON content type: {}", err)
        }
        _ => "Failed to parse JSON body".to_string(),
    };

    AppError::BadRequest(message).into_response()
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Router};
    use axum_test::TestServer;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct NamePayload {
        #[validate(length(min = 1))]
        name: String,
    }

    async fn echo(ValidatedJson(payload): ValidatedJson<NamePayload>) -> String {
        payload.name
    }

    fn server() -> TestServer {
        TestServer::new(Router::new().route("/echo", post(echo))).unwrap()
    }

    #[tokio::test]
    async fn test_validated_json_accepts_valid_body() {
        let response = server()
            .post("/echo")
            .json(&serde_json::json!({ "name": "Hôtel de ville" }))
            .await;
        response.assert_status_ok();
        response.assert_text("Hôtel de ville");
    }

    #[tokio::test]
    async fn test_validated_json_rejects_invalid_body() {
        let response = server()
            .post("/echo")
            .json(&serde_json::json!({ "name": "" }))
            .await;
        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_validated_json_rejects_malformed_body() {
        let response = server()
            .post("/echo")
            .json(&serde_json::json!({ "other": 1 }))
            .await;
        assert!(response.status_code().is_client_error());
    }
}
