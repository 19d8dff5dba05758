//! Role-based authorization guards.
//!
//! - `admin`: everything, including user administration
//! - `consultant`: reads and edits compliance data
//! - `client`: read-only
//!
//! Reads only need an authenticated user (`AuthenticatedUser` extractor).

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

fn current_user(parts: &Parts) -> Result<&AuthenticatedUser, AppError> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))
}

/// Allows users with the "admin" role.
///
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)?;
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(RequireAdmin(user.clone()))
    }
}

/// Allows "admin" and "consultant". Use for every mutation on compliance data.
pub struct RequireStaff(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)?;
        if !user.is_staff() {
            return Err(AppError::Forbidden("Staff access required".to_string()));
        }
        Ok(RequireStaff(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{user_with_roles, with_user};
    use axum::{routing::get, Router};
    use axum_test::TestServer;

    async fn admin_only(RequireAdmin(user): RequireAdmin) -> String {
        user.sub
    }

    async fn staff_only(RequireStaff(_staff): RequireStaff) -> &'static str {
        "ok"
    }

    fn app() -> Router {
        Router::new()
            .route("/admin", get(admin_only))
            .route("/staff", get(staff_only))
    }

    #[tokio::test]
    async fn test_guards_reject_anonymous_requests() {
        let server = TestServer::new(app()).unwrap();
        server.get("/admin").await.assert_status_unauthorized();
        server.get("/staff").await.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_consultant_is_staff_but_not_admin() {
        let server = TestServer::new(with_user(app(), user_with_roles(&["consultant"]))).unwrap();
        server.get("/staff").await.assert_status_ok();
        server.get("/admin").await.assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_client_is_read_only() {
        let server = TestServer::new(with_user(app(), user_with_roles(&["client"]))).unwrap();
        server.get("/staff").await.assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_admin_passes_every_guard() {
        let server = TestServer::new(with_user(app(), user_with_roles(&["admin"]))).unwrap();
        server.get("/admin").await.assert_status_ok();
        server.get("/staff").await.assert_status_ok();
    }
}
