use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{StoreError, SubmissionStore};
use crate::models::submission::{NewSubmission, Submission};

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemorySubmissionStore {
    rows: RwLock<Vec<Submission>>,
}

impl MemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for MemorySubmissionStore {
    async fn insert(&self, record: &NewSubmission) -> Result<Submission, StoreError> {
        let mut rows = self.rows.write().await;
        // Ids are assigned under the write lock, so they stay dense and unique.
        let stored = Submission {
            id: rows.len() as i64 + 1,
            request: record.clone(),
            submitted_at: Utc::now(),
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<Submission>, StoreError> {
        Ok(self.rows.read().await.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
