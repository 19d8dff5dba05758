use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::files::models::UploadedFile;

/// Multipart upload form, for the OpenAPI document only
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// commission_reports, prescriptions, regulatory_files or verifications
    #[schema(example = "commission_reports")]
    pub folder: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileResponseDto {
    pub id: Uuid,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
    /// Public URL, stored on the owning record (report_url, attachment_url, ...)
    pub url: String,
    pub folder: String,
    pub created_at: DateTime<Utc>,
}

impl From<UploadedFile> for FileResponseDto {
    fn from(f: UploadedFile) -> Self {
        Self {
            id: f.id,
            original_filename: f.original_filename,
            content_type: f.content_type,
            file_size: f.file_size,
            url: f.url,
            folder: f.folder,
            created_at: f.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DeleteFileByUrlDto {
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileResponseDto {
    pub deleted: bool,
}

/// Documents attached to compliance records: scans, photos and office files
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/webp",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// 10 MB
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

pub fn is_mime_type_allowed(content_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&content_type)
}

pub fn extension_for(content_type: &str, original_filename: &str) -> String {
    let known = match content_type {
        "application/pdf" => Some("pdf"),
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "application/msword" => Some("doc"),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => Some("docx"),
        "application/vnd.ms-excel" => Some("xls"),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Some("xlsx"),
        _ => None,
    };

    match known {
        Some(ext) => ext.to_string(),
        None => original_filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| "bin".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_prefers_content_type() {
        assert_eq!(extension_for("application/pdf", "PV commission.PDF"), "pdf");
        assert_eq!(extension_for("image/jpeg", "photo.jpeg"), "jpg");
    }

    #[test]
    fn test_extension_falls_back_to_file_name() {
        assert_eq!(extension_for("application/x-unknown", "plan.DWG"), "dwg");
        assert_eq!(extension_for("application/x-unknown", "sans-extension"), "bin");
        assert_eq!(extension_for("application/x-unknown", "bad.p/df"), "bin");
    }

    #[test]
    fn test_delete_requires_a_url() {
        let dto = DeleteFileByUrlDto {
            url: "not a url".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
