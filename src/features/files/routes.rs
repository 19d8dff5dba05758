use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, post},
    Router,
};

use crate::features::files::dtos::MAX_FILE_SIZE;
use crate::features::files::handlers::file_handler::{delete_file_by_url, upload_file};
use crate::features::files::services::FileService;

pub fn routes(service: Arc<FileService>) -> Router {
    Router::new()
        .route(
            "/api/files/upload",
            // Leave room for the multipart envelope
            post(upload_file).layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 1024 * 1024)),
        )
        .route("/api/files", delete(delete_file_by_url))
        .with_state(service)
}
