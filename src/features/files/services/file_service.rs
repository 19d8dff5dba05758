use std::sync::Arc;

use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{db_error, AppError, Result};
use crate::features::files::dtos::{extension_for, FileResponseDto};
use crate::features::files::models::{UploadFolder, UploadedFile};
use crate::modules::storage::{put_then_record, ObjectStore};

/// Documents attached to commissions, prescriptions, regulatory files and verifications
pub struct FileService {
    pool: PgPool,
    store: Arc<dyn ObjectStore>,
}

impl FileService {
    pub fn new(pool: PgPool, store: Arc<dyn ObjectStore>) -> Self {
        Self { pool, store }
    }

    /// Store the document under `documents/{folder}/{uuid}.{ext}` and record its metadata.
    ///
    /// The object is removed again if the metadata insert fails.
    pub async fn upload(
        &self,
        data: Vec<u8>,
        original_filename: &str,
        content_type: &str,
        folder: UploadFolder,
        user_id: &str,
    ) -> Result<FileResponseDto> {
        let file_size = data.len() as i64;
        let path = document_path(
            folder,
            Uuid::new_v4(),
            &extension_for(content_type, original_filename),
        );
        let file_key = self.store.public_key(&path);

        let file = put_then_record(
            self.store.as_ref(),
            &file_key,
            data,
            content_type,
            || self.record(&file_key, original_filename, content_type, file_size, folder, user_id),
        )
        .await?;

        info!(
            "File uploaded: id={}, key={}, size={}",
            file.id, file.file_key, file.file_size
        );
        Ok(file.into())
    }

    async fn record(
        &self,
        file_key: &str,
        original_filename: &str,
        content_type: &str,
        file_size: i64,
        folder: UploadFolder,
        user_id: &str,
    ) -> Result<UploadedFile> {
        let url = self.store.public_url(file_key);
        sqlx::query_as::<_, UploadedFile>(
            r#"
            INSERT INTO uploaded_files
                (file_key, original_filename, content_type, file_size, url, folder, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(file_key)
        .bind(original_filename)
        .bind(content_type)
        .bind(file_size)
        .bind(&url)
        .bind(folder.as_str())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to save file metadata"))
    }

    /// Remove a document by its public URL. Only the uploader may delete it.
    pub async fn delete_by_url(&self, url: &str, user_id: &str) -> Result<()> {
        let file_key = self.store.key_from_url(url).ok_or_else(|| {
            AppError::BadRequest("URL does not point to file storage".to_string())
        })?;

        let file = sqlx::query_as::<_, UploadedFile>(
            "SELECT * FROM uploaded_files WHERE file_key = $1 AND is_active = TRUE",
        )
        .bind(&file_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find file"))?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        if file.uploaded_by != user_id {
            return Err(AppError::Forbidden(
                "You do not have permission to delete this file".to_string(),
            ));
        }

        self.store.remove(&file.file_key).await?;
        debug!("Object removed: {}", file.file_key);

        sqlx::query("UPDATE uploaded_files SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(file.id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to deactivate file"))?;

        info!("File soft deleted: id={}, key={}", file.id, file.file_key);
        Ok(())
    }
}

fn document_path(folder: UploadFolder, id: Uuid, extension: &str) -> String {
    format!("documents/{}/{}.{}", folder, id, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_are_grouped_by_folder() {
        let id = Uuid::nil();
        assert_eq!(
            document_path(UploadFolder::RegulatoryFiles, id, "pdf"),
            "documents/regulatory_files/00000000-0000-0000-0000-000000000000.pdf"
        );
    }
}
