//! REST implementation of the submission gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::{GatewayResult, ProfileStatus, SubmissionError, SubmissionGateway};
use crate::config::ApiConfig;
use crate::core::media::StagedFile;
use crate::core::requests::{JobRecord, Payload, RequestRecord};

const REQUESTS_PATH: &str = "/developer-requests";
const JOBS_PATH: &str = "/jobs";
const JOB_MEDIA_PATH: &str = "/jobs/media";
const PROFILE_COMPLETENESS_PATH: &str = "/employer/profile/completeness";

/// Gateway backed by the platform's REST API.
pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpGateway {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> GatewayResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn from_config(api: &ApiConfig) -> GatewayResult<Self> {
        Self::new(
            api.base_url.clone(),
            api.token.clone(),
            Duration::from_secs(api.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn read<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = error_from_body(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), error = %err, "Backend rejected request");
            return Err(err);
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        Ok(envelope.into_inner())
    }
}

#[async_trait]
impl SubmissionGateway for HttpGateway {
    async fn check_profile(&self) -> GatewayResult<ProfileStatus> {
        let url = self.url(PROFILE_COMPLETENESS_PATH);
        tracing::debug!(%url, "Checking profile completeness");
        let response = self.authorized(self.client.get(&url)).send().await?;
        Self::read(response).await
    }

    async fn create_request(&self, payload: Payload) -> GatewayResult<RequestRecord> {
        let url = self.url(REQUESTS_PATH);
        tracing::info!(%url, "Creating developer request");
        let response = self
            .authorized(self.client.post(&url))
            .json(&payload)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn update_request(&self, id: String, payload: Payload) -> GatewayResult<RequestRecord> {
        let url = format!("{}/{}", self.url(REQUESTS_PATH), id);
        tracing::info!(%url, "Updating developer request");
        let response = self
            .authorized(self.client.put(&url))
            .json(&payload)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn create_job(&self, payload: Payload) -> GatewayResult<JobRecord> {
        let url = self.url(JOBS_PATH);
        tracing::info!(%url, "Creating job posting");
        let response = self
            .authorized(self.client.post(&url))
            .json(&payload)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn upload_media(&self, files: Vec<StagedFile>) -> GatewayResult<Vec<String>> {
        let url = self.url(JOB_MEDIA_PATH);
        let mut form = Form::new();
        for file in &files {
            let bytes = tokio::fs::read(&file.path)
                .await
                .map_err(|e| SubmissionError::Media {
                    file: file.file_name.clone(),
                    reason: e.to_string(),
                })?;
            let part = Part::bytes(bytes)
                .file_name(file.file_name.clone())
                .mime_str(&file.mime_type)?;
            form = form.part("media", part);
        }

        tracing::info!(%url, files = files.len(), "Uploading media");
        let response = self
            .authorized(self.client.post(&url))
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadResponse = Self::read(response).await?;
        Ok(uploaded.into_filenames())
    }
}

/// Responses come either bare or wrapped in `{"data": ...}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(inner) => inner,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UploadResponse {
    Files { files: Vec<String> },
    Filenames { filenames: Vec<String> },
    Bare(Vec<String>),
}

impl UploadResponse {
    fn into_filenames(self) -> Vec<String> {
        match self {
            UploadResponse::Files { files } => files,
            UploadResponse::Filenames { filenames } => filenames,
            UploadResponse::Bare(names) => names,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    redirect_reason: Option<Value>,
}

/// Map a non-2xx body to a structured error.
fn error_from_body(status: u16, body: &str) -> SubmissionError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    let message = parsed
        .message
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            let raw = body.trim();
            if raw.is_empty() {
                format!("HTTP {status}")
            } else {
                raw.to_string()
            }
        });

    let redirect = match parsed.redirect_reason {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => flag,
        Some(Value::String(reason)) => !reason.trim().is_empty(),
        Some(_) => true,
    };

    if redirect {
        SubmissionError::ProfileIncomplete { message }
    } else {
        SubmissionError::Api { status, message }
    }
}
