//! Hand-written test doubles
//!
//! The gateway trait is automocked with mockall next to its definition; the
//! doubles here cover what expectations can't express: a preview provider that
//! records every call and a gateway that never answers.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::gateway::{GatewayResult, ProfileStatus, SubmissionGateway};
use crate::core::media::{PreviewProvider, StagedFile};
use crate::core::requests::{JobRecord, Payload, RequestRecord};

// ============================================================================
// Preview Provider
// ============================================================================

/// Records every created and revoked preview URL.
#[derive(Debug, Default)]
pub struct RecordingPreviews {
    next: AtomicUsize,
    created: Mutex<Vec<String>>,
    revoked: Mutex<Vec<String>>,
}

impl RecordingPreviews {
    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    pub fn revoked(&self) -> Vec<String> {
        self.revoked.lock().unwrap().clone()
    }

    pub fn revoke_count(&self, url: &str) -> usize {
        self.revoked.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

impl PreviewProvider for RecordingPreviews {
    fn create(&self, file: &StagedFile) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        let url = format!("preview://{n}/{}", file.file_name);
        self.created.lock().unwrap().push(url.clone());
        url
    }

    fn revoke(&self, url: &str) {
        self.revoked.lock().unwrap().push(url.to_string());
    }
}

// ============================================================================
// Gateway
// ============================================================================

/// A gateway whose calls never complete. Counts how many were started.
#[derive(Debug, Default)]
pub struct StallingGateway {
    calls: AtomicUsize,
}

impl StallingGateway {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn stall<T>(&self) -> GatewayResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

#[async_trait]
impl SubmissionGateway for StallingGateway {
    async fn check_profile(&self) -> GatewayResult<ProfileStatus> {
        self.stall().await
    }

    async fn create_request(&self, _payload: Payload) -> GatewayResult<RequestRecord> {
        self.stall().await
    }

    async fn update_request(&self, _id: String, _payload: Payload) -> GatewayResult<RequestRecord> {
        self.stall().await
    }

    async fn create_job(&self, _payload: Payload) -> GatewayResult<JobRecord> {
        self.stall().await
    }

    async fn upload_media(&self, _files: Vec<StagedFile>) -> GatewayResult<Vec<String>> {
        self.stall().await
    }
}
