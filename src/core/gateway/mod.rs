//! Submission gateway: the wizard's only view of the backend.
//!
//! The [`SubmissionGateway`] trait is the seam between the wizard and the
//! network. [`HttpGateway`] talks to the REST API; tests substitute mocks.

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::media::StagedFile;
use crate::core::requests::{attach_media, JobRecord, Payload, RequestRecord};

pub use http::HttpGateway;

/// Errors a submission can end with. All of them are shown to the user; none
/// escape as panics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// The backend refused because the employer profile is incomplete.
    #[error("{message}")]
    ProfileIncomplete { message: String },

    #[error("Request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Failed to read {file}: {reason}")]
    Media { file: String, reason: String },

    #[error("Submission cancelled")]
    Cancelled,
}

impl SubmissionError {
    /// Whether the user must complete their profile before retrying.
    pub fn redirect_reason(&self) -> bool {
        matches!(self, SubmissionError::ProfileIncomplete { .. })
    }

    /// Text for the banner above the current step.
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for SubmissionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SubmissionError::Network("request timed out".to_string())
        } else if e.is_decode() {
            SubmissionError::InvalidResponse(e.to_string())
        } else {
            SubmissionError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SubmissionError {
    fn from(e: serde_json::Error) -> Self {
        SubmissionError::InvalidResponse(e.to_string())
    }
}

pub type GatewayResult<T> = Result<T, SubmissionError>;

/// Result of the profile-completeness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStatus {
    pub is_complete: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// What a successful submission produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmittedRecord {
    Request(RequestRecord),
    Job(JobRecord),
}

impl SubmittedRecord {
    pub fn id(&self) -> &str {
        match self {
            SubmittedRecord::Request(r) => &r.id,
            SubmittedRecord::Job(j) => &j.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            SubmittedRecord::Request(r) => &r.project_title,
            SubmittedRecord::Job(j) => &j.title,
        }
    }
}

/// Which backend operation a submission calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionTarget {
    CreateRequest,
    UpdateRequest { id: String },
    CreateJob,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn check_profile(&self) -> GatewayResult<ProfileStatus>;

    async fn create_request(&self, payload: Payload) -> GatewayResult<RequestRecord>;

    async fn update_request(&self, id: String, payload: Payload) -> GatewayResult<RequestRecord>;

    async fn create_job(&self, payload: Payload) -> GatewayResult<JobRecord>;

    /// Upload files as repeated `media` parts; returns the stored filenames.
    async fn upload_media(&self, files: Vec<StagedFile>) -> GatewayResult<Vec<String>>;
}

/// Send a payload to its target. Staged media are uploaded first and their
/// stored names folded into the payload's `media` key.
pub async fn send(
    gateway: &dyn SubmissionGateway,
    target: SubmissionTarget,
    mut payload: Payload,
    media: Vec<StagedFile>,
) -> GatewayResult<SubmittedRecord> {
    if !media.is_empty() {
        let count = media.len();
        let stored = gateway.upload_media(media).await?;
        tracing::info!(uploaded = count, stored = stored.len(), "Media uploaded");
        attach_media(&mut payload, &stored)?;
    }

    match target {
        SubmissionTarget::CreateRequest => gateway
            .create_request(payload)
            .await
            .map(SubmittedRecord::Request),
        SubmissionTarget::UpdateRequest { id } => gateway
            .update_request(id, payload)
            .await
            .map(SubmittedRecord::Request),
        SubmissionTarget::CreateJob => gateway.create_job(payload).await.map(SubmittedRecord::Job),
    }
}
