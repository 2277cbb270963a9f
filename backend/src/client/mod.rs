//! Typed HTTP client for the intake API.
//!
//! Drives a running server over HTTP; the Postgres end-to-end test uses it.
//! Server-side validation failures come back as
//! [`ClientError::Rejected`] with the same per-field errors the schema
//! produced.

use std::time::Duration;

use reqwest::StatusCode;

use crate::errors::ErrorBody;
use crate::models::submission::{Submission, SubmissionCandidate};
use crate::schema::ValidationErrors;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection, timeout or body decode failure.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server refused the candidate with per-field errors.
    #[error("Submission rejected: {0}")]
    Rejected(ValidationErrors),

    /// Any other non-success status.
    #[error("Server returned HTTP {status}: {message}")]
    Server { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct IntakeClient {
    http: reqwest::Client,
    base_url: String,
}

impl IntakeClient {
    /// Client for the API rooted at `base_url`, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn submissions_url(&self) -> String {
        format!("{}/api/submissions", self.base_url)
    }

    pub async fn create(&self, candidate: &SubmissionCandidate) -> Result<Submission, ClientError> {
        let response = self
            .http
            .post(self.submissions_url())
            .json(candidate)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => Ok(response.json().await?),
            StatusCode::BAD_REQUEST => {
                let body: ErrorBody = response.json().await?;
                let mut errors = ValidationErrors::new();
                for e in body.errors.unwrap_or_default() {
                    errors.push(e.path, e.message);
                }
                if errors.is_empty() {
                    errors.push("body", body.message);
                }
                Err(ClientError::Rejected(errors))
            }
            status => Err(server_error(status, response).await),
        }
    }

    pub async fn list(&self) -> Result<Vec<Submission>, ClientError> {
        let response = self.http.get(self.submissions_url()).send().await?;
        if !response.status().is_success() {
            return Err(server_error(response.status(), response).await);
        }
        Ok(response.json().await?)
    }
}

async fn server_error(status: StatusCode, response: reqwest::Response) -> ClientError {
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
    };
    ClientError::Server {
        status: status.as_u16(),
        message,
    }
}
