use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;

/// Storage folder of a document; also the upload form's `folder` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UploadFolder {
    CommissionReports,
    Prescriptions,
    RegulatoryFiles,
    Verifications,
}

impl UploadFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadFolder::CommissionReports => "commission_reports",
            UploadFolder::Prescriptions => "prescriptions",
            UploadFolder::RegulatoryFiles => "regulatory_files",
            UploadFolder::Verifications => "verifications",
        }
    }
}

impl fmt::Display for UploadFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadFolder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "commission_reports" => Ok(UploadFolder::CommissionReports),
            "prescriptions" => Ok(UploadFolder::Prescriptions),
            "regulatory_files" => Ok(UploadFolder::RegulatoryFiles),
            "verifications" => Ok(UploadFolder::Verifications),
            other => Err(AppError::BadRequest(format!(
                "Unknown folder '{}'. Expected commission_reports, prescriptions, regulatory_files or verifications",
                other
            ))),
        }
    }
}

/// Metadata row of an uploaded document
#[derive(Debug, FromRow)]
pub struct UploadedFile {
    pub id: Uuid,
    pub file_key: String,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
    pub url: String,
    pub folder: String,
    pub uploaded_by: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_round_trips_through_text() {
        for folder in [
            UploadFolder::CommissionReports,
            UploadFolder::Prescriptions,
            UploadFolder::RegulatoryFiles,
            UploadFolder::Verifications,
        ] {
            assert_eq!(folder.as_str().parse::<UploadFolder>().unwrap(), folder);
        }
    }

    #[test]
    fn test_unknown_folder_is_a_bad_request() {
        assert!(matches!(
            "avatars".parse::<UploadFolder>(),
            Err(AppError::BadRequest(_))
        ));
    }
}
