//! Storage module for uploaded images
//!
//! Provides the MinIO/S3-compatible client used for avatars and the
//! images attached to reports and news.

mod minio_client;

#[cfg(test)]
pub use minio_client::test_client;
pub use minio_client::{MinIOClient, PendingObject};
