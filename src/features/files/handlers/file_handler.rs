use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::core::extractor::ValidatedJson;
use crate::features::auth::guards::RequireStaff;
use crate::features::files::dtos::{
    is_mime_type_allowed, DeleteFileByUrlDto, DeleteFileResponseDto, FileResponseDto,
    UploadFileDto, ALLOWED_MIME_TYPES, MAX_FILE_SIZE,
};
use crate::features::files::models::UploadFolder;
use crate::features::files::services::FileService;
use crate::shared::types::ApiResponse;

/// Upload a document.
///
/// Multipart form with `file` and `folder`. The response carries the public
/// URL to store on the owning record.
#[utoipa::path(
    post,
    path = "/api/files/upload",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "Document and its destination folder",
    ),
    responses(
        (status = 201, description = "File uploaded", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Missing file, unknown folder or unsupported type"),
        (status = 413, description = "File too large")
    ),
    security(("bearer_auth" = [])),
    tag = "files"
)]
pub async fn upload_file(
    RequireStaff(user): RequireStaff,
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileResponseDto>>)> {
    let mut upload: Option<(Vec<u8>, String, String)> = None;
    let mut folder: Option<UploadFolder> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let file_name = field.file_name().unwrap_or("document").to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;
                upload = Some((data.to_vec(), file_name, content_type));
            }
            "folder" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read folder field: {}", e))
                })?;
                folder = Some(text.parse()?);
            }
            other => debug!("Ignoring multipart field '{}'", other),
        }
    }

    let (data, file_name, content_type) =
        upload.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;
    let folder = folder.ok_or_else(|| AppError::BadRequest("Folder is required".to_string()))?;

    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::BadRequest(format!(
            "File too large. Maximum size is {} MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }
    if !is_mime_type_allowed(&content_type) {
        return Err(AppError::BadRequest(format!(
            "File type '{}' is not allowed. Allowed types: {}",
            content_type,
            ALLOWED_MIME_TYPES.join(", ")
        )));
    }

    let file = service
        .upload(data, &file_name, &content_type, folder, &user.sub)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(file),
            Some("File uploaded".to_string()),
            None,
        )),
    ))
}

/// Delete a document by URL; only its uploader may do so
#[utoipa::path(
    delete,
    path = "/api/files",
    request_body = DeleteFileByUrlDto,
    responses(
        (status = 200, description = "File deleted", body = ApiResponse<DeleteFileResponseDto>),
        (status = 400, description = "Invalid URL or not a storage URL"),
        (status = 403, description = "Not the uploader"),
        (status = 404, description = "File not found")
    ),
    security(("bearer_auth" = [])),
    tag = "files"
)]
pub async fn delete_file_by_url(
    RequireStaff(user): RequireStaff,
    State(service): State<Arc<FileService>>,
    ValidatedJson(dto): ValidatedJson<DeleteFileByUrlDto>,
) -> Result<Json<ApiResponse<DeleteFileResponseDto>>> {
    service.delete_by_url(&dto.url, &user.sub).await?;

    Ok(Json(ApiResponse::success(
        Some(DeleteFileResponseDto { deleted: true }),
        Some("File deleted".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;

    use crate::features::files::{routes, FileService};
    use crate::modules::storage::MemoryStore;
    use crate::shared::test_helpers::{lazy_pool, user_with_roles, with_user};

    fn server(roles: &[&str]) -> TestServer {
        let service = FileService::new(lazy_pool(), Arc::new(MemoryStore::default()));
        TestServer::new(with_user(routes(Arc::new(service)), user_with_roles(roles))).unwrap()
    }

    fn pdf_part() -> Part {
        Part::bytes(b"%PDF-1.4".to_vec())
            .file_name("PV commission.pdf")
            .mime_type("application/pdf")
    }

    #[tokio::test]
    async fn test_clients_cannot_upload() {
        let form = MultipartForm::new()
            .add_text("folder", "prescriptions")
            .add_part("file", pdf_part());
        server(&["client"])
            .post("/api/files/upload")
            .multipart(form)
            .await
            .assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_unknown_folder_is_rejected() {
        let form = MultipartForm::new()
            .add_text("folder", "avatars")
            .add_part("file", pdf_part());
        server(&["consultant"])
            .post("/api/files/upload")
            .multipart(form)
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_missing_file_is_rejected() {
        let form = MultipartForm::new().add_text("folder", "verifications");
        server(&["consultant"])
            .post("/api/files/upload")
            .multipart(form)
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_unsupported_type_is_rejected() {
        let part = Part::bytes(b"MZ".to_vec())
            .file_name("setup.exe")
            .mime_type("application/x-msdownload");
        let form = MultipartForm::new()
            .add_text("folder", "verifications")
            .add_part("file", part);
        server(&["admin"])
            .post("/api/files/upload")
            .multipart(form)
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_foreign_url_is_rejected_before_lookup() {
        server(&["consultant"])
            .delete("/api/files")
            .json(&serde_json::json!({ "url": "https://elsewhere.test/plan.pdf" }))
            .await
            .assert_status_bad_request();
    }
}
