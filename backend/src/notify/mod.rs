//! Best-effort notification of new submissions.
//!
//! [`Notifier::dispatch`] is called after a submission is committed. It
//! spawns a detached task that formats the summary and offers it to every
//! sink in turn. Sink failures are logged and pushed onto the failure
//! channel; they never reach the HTTP caller and never stop the other sinks.

pub mod email;
pub mod summary;
pub mod webhook;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::config::NotifyConfig;
use crate::models::submission::Submission;

pub use email::{EmailError, EmailSink};
pub use summary::format_summary;
pub use webhook::{WebhookError, WebhookSink};

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error(transparent)]
    Webhook(#[from] WebhookError),

    #[error(transparent)]
    Email(#[from] EmailError),
}

/// A destination that accepts a preformatted text summary.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, summary: &str) -> Result<(), NotificationError>;
}

/// Placeholder for a sink with no configuration: logs what it would send.
#[derive(Debug, Clone)]
pub struct LogOnlySink {
    name: &'static str,
}

impl LogOnlySink {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

#[async_trait]
impl NotificationSink for LogOnlySink {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn send(&self, summary: &str) -> Result<(), NotificationError> {
        tracing::info!(
            sink = self.name,
            summary,
            "Notification sink not configured, would have sent summary"
        );
        Ok(())
    }
}

/// One sink failing for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationFailure {
    pub submission_id: i64,
    pub sink: &'static str,
    pub error: String,
}

/// Outcome of offering one summary to every sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub delivered: Vec<&'static str>,
    pub failed: Vec<&'static str>,
}

/// Fans a submission summary out to the configured sinks.
#[derive(Clone)]
pub struct Notifier {
    sinks: Arc<Vec<Arc<dyn NotificationSink>>>,
    failures: mpsc::UnboundedSender<NotificationFailure>,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("sinks", &self.sink_names())
            .finish()
    }
}

impl Notifier {
    /// Notifier over `sinks`, plus the receiving end of its failure channel.
    pub fn new(
        sinks: Vec<Arc<dyn NotificationSink>>,
    ) -> (Self, mpsc::UnboundedReceiver<NotificationFailure>) {
        let (failures, rx) = mpsc::unbounded_channel();
        (
            Self {
                sinks: Arc::new(sinks),
                failures,
            },
            rx,
        )
    }

    /// Webhook and email sinks from config. Missing or unusable settings
    /// degrade to a [`LogOnlySink`] rather than an error.
    pub fn from_config(
        config: &NotifyConfig,
    ) -> (Self, mpsc::UnboundedReceiver<NotificationFailure>) {
        let slack: Arc<dyn NotificationSink> = match &config.slack_webhook_url {
            Some(url) => match WebhookSink::new(url.clone()) {
                Ok(sink) => Arc::new(sink),
                Err(e) => {
                    tracing::warn!(error = %e, "Webhook sink unusable, falling back to log only");
                    Arc::new(LogOnlySink::new("slack"))
                }
            },
            None => Arc::new(LogOnlySink::new("slack")),
        };

        let email: Arc<dyn NotificationSink> = match &config.email {
            Some(email_config) => match EmailSink::new(email_config) {
                Ok(sink) => Arc::new(sink),
                Err(e) => {
                    tracing::warn!(error = %e, "Email sink unusable, falling back to log only");
                    Arc::new(LogOnlySink::new("email"))
                }
            },
            None => Arc::new(LogOnlySink::new("email")),
        };

        Self::new(vec![slack, email])
    }

    pub fn sink_names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Fire-and-forget delivery on a detached task.
    ///
    /// The handle is returned for tests; request handlers drop it.
    pub fn dispatch(&self, submission: &Submission) -> JoinHandle<DispatchReport> {
        let notifier = self.clone();
        let submission_id = submission.id;
        let summary = format_summary(submission);
        let span = tracing::info_span!("notify", submission_id);
        tokio::spawn(
            async move { notifier.deliver(submission_id, &summary).await }.instrument(span),
        )
    }

    /// Offer `summary` to every sink; each failure is isolated.
    pub async fn deliver(&self, submission_id: i64, summary: &str) -> DispatchReport {
        let mut report = DispatchReport::default();
        for sink in self.sinks.iter() {
            match sink.send(summary).await {
                Ok(()) => report.delivered.push(sink.name()),
                Err(e) => {
                    tracing::error!(sink = sink.name(), error = %e, "Notification delivery failed");
                    report.failed.push(sink.name());
                    let failure = NotificationFailure {
                        submission_id,
                        sink: sink.name(),
                        error: e.to_string(),
                    };
                    if self.failures.send(failure).is_err() {
                        tracing::debug!("Notification failure channel closed");
                    }
                }
            }
        }
        report
    }
}

/// Drain the failure channel into the log until every sender is gone.
pub async fn log_failures(mut failures: mpsc::UnboundedReceiver<NotificationFailure>) {
    while let Some(failure) = failures.recv().await {
        tracing::warn!(
            submission_id = failure.submission_id,
            sink = failure.sink,
            error = %failure.error,
            "Notification not delivered"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::config::EmailConfig;
    use crate::models::submission::{
        BusinessRequirement, NewSubmission, OwnerAwareness, SchedulingPreference, TargetType,
        TestType,
    };

    #[derive(Default)]
    struct RecordingSink {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn send(&self, summary: &str) -> Result<(), NotificationError> {
            self.seen.lock().unwrap().push(summary.to_string());
            Ok(())
        }
    }

    struct BrokenSink;

    #[async_trait]
    impl NotificationSink for BrokenSink {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn send(&self, _summary: &str) -> Result<(), NotificationError> {
            Err(WebhookError::HttpStatus(503).into())
        }
    }

    fn submission() -> Submission {
        Submission {
            id: 42,
            request: NewSubmission {
                business_requirement: BusinessRequirement::Proactive,
                test_types: vec![TestType::BlackBox],
                scope_description: "Test our external perimeter".to_string(),
                owner_awareness: OwnerAwareness::Aware,
                in_scope_assets: "example.com".to_string(),
                target_type: TargetType::Website,
                target_other: None,
                is_production: false,
                external_details: None,
                internal_details: None,
                social_engineering_details: None,
                scheduling_preferences: SchedulingPreference::BusinessHours,
                scheduling_other: None,
                contact_name: "Jane Doe".to_string(),
                contact_email: "jane@example.com".to_string(),
            },
            submitted_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn one_failing_sink_does_not_block_the_others() {
        let recording = Arc::new(RecordingSink::default());
        let (notifier, mut failures) = Notifier::new(vec![
            Arc::new(BrokenSink) as Arc<dyn NotificationSink>,
            recording.clone(),
        ]);

        let report = notifier.dispatch(&submission()).await.unwrap();
        assert_eq!(report.delivered, vec!["recording"]);
        assert_eq!(report.failed, vec!["broken"]);
        assert_eq!(recording.seen.lock().unwrap().len(), 1);

        let failure = failures.recv().await.unwrap();
        assert_eq!(failure.submission_id, 42);
        assert_eq!(failure.sink, "broken");
        assert_eq!(failure.error, "Webhook returned HTTP 503");
    }

    #[tokio::test]
    async fn unconfigured_sinks_are_noops() {
        let (notifier, mut failures) = Notifier::from_config(&NotifyConfig::default());
        assert_eq!(notifier.sink_names(), vec!["slack", "email"]);

        let report = notifier.dispatch(&submission()).await.unwrap();
        assert_eq!(report.delivered, vec!["slack", "email"]);
        assert!(report.failed.is_empty());
        assert!(failures.try_recv().is_err());
    }

    #[tokio::test]
    async fn closed_failure_channel_is_tolerated() {
        let (notifier, failures) =
            Notifier::new(vec![Arc::new(BrokenSink) as Arc<dyn NotificationSink>]);
        drop(failures);
        let report = notifier.deliver(1, "summary").await;
        assert_eq!(report.failed, vec!["broken"]);
    }

    #[test]
    fn unusable_email_config_degrades_to_log_only() {
        let config = NotifyConfig {
            slack_webhook_url: None,
            email: Some(EmailConfig {
                smtp_host: "smtp.example.com".to_string(),
                smtp_port: 587,
                from_address: "not an address".to_string(),
                smtp_user: None,
                smtp_password: None,
                recipients: vec!["sec@example.com".to_string()],
            }),
        };
        let (notifier, _failures) = Notifier::from_config(&config);
        assert_eq!(notifier.sink_names(), vec!["slack", "email"]);
    }
}
