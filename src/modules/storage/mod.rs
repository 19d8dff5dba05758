//! S3-compatible object storage (MinIO in every deployment).

mod minio_client;
mod object_store;
mod sigv4;

pub use minio_client::MinIOClient;
pub use object_store::{put_then_record, ObjectStore};

#[cfg(test)]
pub use object_store::memory::MemoryStore;
