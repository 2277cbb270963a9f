//! Append-only submission storage.
//!
//! The service layer only needs insert and full read, so the trait is kept
//! that narrow. Records are never updated or deleted.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::submission::{NewSubmission, Submission, UnknownValue};

pub use memory::MemorySubmissionStore;
pub use postgres::PgSubmissionStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row no longer matches the current vocabulary.
    #[error("corrupt row {id}: {source}")]
    Corrupt { id: i64, source: UnknownValue },
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(e) => AppError::Database(e),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Storage abstraction so the service can run against Postgres or memory.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persist one record atomically, assigning `id` and `submitted_at`.
    async fn insert(&self, record: &NewSubmission) -> Result<Submission, StoreError>;

    /// Every stored record, ordered by id.
    async fn list_all(&self) -> Result<Vec<Submission>, StoreError>;

    /// Cheap connectivity probe for readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
