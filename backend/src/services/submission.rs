//! Submission intake: validate, persist, then notify.

use serde_json::Value;

use crate::errors::AppError;
use crate::models::submission::{NewSubmission, Submission};
use crate::notify::Notifier;
use crate::schema;
use crate::store::SubmissionStore;

/// Validate a raw JSON body and create it. Nothing is stored when
/// validation fails.
pub async fn submit(
    store: &dyn SubmissionStore,
    notifier: &Notifier,
    body: &Value,
) -> Result<Submission, AppError> {
    let record = schema::validate_json(body).map_err(|errors| {
        tracing::debug!(errors = errors.len(), "Submission rejected by schema");
        AppError::Validation(errors)
    })?;
    create(store, notifier, &record).await
}

/// Persist one validated record and kick off notification.
///
/// Notification runs detached after the insert commits; its outcome never
/// changes this function's result.
pub async fn create(
    store: &dyn SubmissionStore,
    notifier: &Notifier,
    record: &NewSubmission,
) -> Result<Submission, AppError> {
    let stored = store.insert(record).await?;

    tracing::info!(
        submission_id = stored.id,
        backend = store.backend(),
        target_type = %stored.request.target_type,
        is_production = stored.request.is_production,
        "Submission created"
    );

    // Dropping the handle detaches the task.
    let _ = notifier.dispatch(&stored);

    Ok(stored)
}

/// Every stored submission. Unpaginated and unfiltered.
pub async fn list(store: &dyn SubmissionStore) -> Result<Vec<Submission>, AppError> {
    Ok(store.list_all().await?)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::models::submission::SubmissionCandidate;
    use crate::store::{MemorySubmissionStore, StoreError};

    fn candidate() -> SubmissionCandidate {
        SubmissionCandidate {
            business_requirement: "proactive".to_string(),
            test_types: vec!["black_box".to_string()],
            scope_description: "Test our external perimeter".to_string(),
            owner_awareness: "true".to_string(),
            in_scope_assets: "example.com".to_string(),
            target_type: "website".to_string(),
            is_production: Some(false),
            scheduling_preferences: "business_hours".to_string(),
            contact_name: "Jane Doe".to_string(),
            contact_email: "jane@example.com".to_string(),
            ..Default::default()
        }
    }

    /// Store that counts inserts and can be told to fail.
    #[derive(Default)]
    struct ProbeStore {
        inserts: AtomicUsize,
        fail: bool,
        inner: MemorySubmissionStore,
    }

    #[async_trait]
    impl SubmissionStore for ProbeStore {
        async fn insert(&self, record: &NewSubmission) -> Result<Submission, StoreError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
            }
            self.inner.insert(record).await
        }

        async fn list_all(&self) -> Result<Vec<Submission>, StoreError> {
            self.inner.list_all().await
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }

        fn backend(&self) -> &'static str {
            "probe"
        }
    }

    fn notifier() -> Notifier {
        Notifier::new(Vec::new()).0
    }

    #[tokio::test]
    async fn invalid_candidate_never_reaches_store() {
        let store = ProbeStore::default();
        let mut c = candidate();
        c.contact_email = "not-an-email".to_string();
        let body = serde_json::to_value(&c).unwrap();

        let err = submit(&store, &notifier(), &body).await.unwrap_err();
        match err {
            AppError::Validation(errors) => assert!(errors.get("contactEmail").is_some()),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn create_then_list_round_trips() {
        let store = Arc::new(MemorySubmissionStore::new());
        let record = schema::validate(&candidate()).unwrap();

        let stored = create(store.as_ref(), &notifier(), &record).await.unwrap();
        assert!(stored.id > 0);

        let listed = list(store.as_ref()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].request, record);
        assert_eq!(listed[0].id, stored.id);
        assert_eq!(listed[0].submitted_at, stored.submitted_at);
    }

    #[tokio::test]
    async fn persistence_failure_is_internal() {
        let store = ProbeStore {
            fail: true,
            ..Default::default()
        };
        let body = serde_json::to_value(candidate()).unwrap();
        let err = submit(&store, &notifier(), &body).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
    }
}
