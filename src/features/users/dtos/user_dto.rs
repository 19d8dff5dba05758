use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::establishments::dtos::EstablishmentSummaryDto;
use crate::features::users::models::{User, UserRole};
use crate::shared::types::BadgeVariant;

/// Minimal user reference embedded in other resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserSummaryDto {
    pub id: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponseDto {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub role_label: String,
    pub role_badge: BadgeVariant,
    /// Establishments the user was granted access to
    pub establishments: Vec<EstablishmentSummaryDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserResponseDto {
    pub fn assemble(user: User, establishments: Vec<EstablishmentSummaryDto>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            phone: user.phone,
            role_label: user.role.label().to_string(),
            role_badge: user.role.badge(),
            role: user.role,
            establishments,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Consultant or assignee option for pickers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserOptionDto {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub role_label: String,
}

impl From<User> for UserOptionDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            phone: user.phone,
            role_label: user.role.label().to_string(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 200, message = "Full name must be 1-200 characters"))]
    pub full_name: String,
    #[validate(regex(
        path = "*crate::shared::validation::PHONE_REGEX",
        message = "Invalid phone number"
    ))]
    pub phone: Option<String>,
    pub role: UserRole,
    /// Establishments to grant right away
    #[serde(default)]
    pub establishment_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, max = 200, message = "Full name must be 1-200 characters"))]
    pub full_name: Option<String>,
    #[validate(regex(
        path = "*crate::shared::validation::PHONE_REGEX",
        message = "Invalid phone number"
    ))]
    pub phone: Option<String>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GrantAccessDto {
    pub establishment_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_validation() {
        let dto: CreateUserDto = serde_json::from_value(serde_json::json!({
            "email": "not-an-email",
            "full_name": "Paul Durand",
            "role": "consultant"
        }))
        .unwrap();
        assert!(dto.validate().is_err());

        let dto: CreateUserDto = serde_json::from_value(serde_json::json!({
            "email": "paul.durand@example.fr",
            "full_name": "Paul Durand",
            "phone": "06 12 34 56 78",
            "role": "client",
            "establishment_ids": ["5b0c7a3e-7c1d-4d43-9c55-0f9a7a3c1e21"]
        }))
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.establishment_ids.len(), 1);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result: Result<UpdateUserDto, _> =
            serde_json::from_value(serde_json::json!({ "role": "superuser" }));
        assert!(result.is_err());
    }
}
