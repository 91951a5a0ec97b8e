//! Wizard controller: step index, field values, validation errors and the
//! submission lifecycle for one open wizard.
//!
//! The controller is driven from a single event loop. Everything is
//! synchronous except the submission, which runs as a spawned Tokio task and is
//! collected by [`WizardController::poll`] (non-blocking) or
//! [`WizardController::wait_for_submission`]. Dropping the controller aborts an
//! in-flight submission.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tokio::task::{JoinError, JoinHandle};

use super::fields::{FieldValue, FormFields, ValidationErrors, SUBMIT_ERROR_KEY};
use super::multi_select::toggle;
use super::schema::{FormKind, FormSchema};
use super::validator::{validate_all, validate_step};
use crate::core::gateway::{
    self, GatewayResult, ProfileStatus, SubmissionError, SubmissionGateway, SubmissionTarget,
    SubmittedRecord,
};
use crate::core::media::{MediaStagingArea, PreviewProvider, StagedFile};
use crate::core::requests::{build_payload, lenient, RequestRecord};

/// How long a success message stays up before the wizard completes.
pub const DEFAULT_SUCCESS_DELAY: Duration = Duration::from_millis(2000);

const DEFAULT_INCOMPLETE_MESSAGE: &str =
    "Your profile is incomplete. Complete it before creating a request.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    /// Last submission failed; submitting again is allowed.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardMode {
    Create,
    Edit { id: String },
}

/// Whether the profile-completeness check lets the wizard be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileGate {
    Unchecked,
    Ready,
    Blocked { message: String },
}

impl ProfileGate {
    pub fn is_blocked(&self) -> bool {
        matches!(self, ProfileGate::Blocked { .. })
    }

    pub fn is_unchecked(&self) -> bool {
        matches!(self, ProfileGate::Unchecked)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The submission task was spawned.
    Started,
    /// A submission is in flight or finishing; nothing was sent.
    AlreadySubmitting,
    /// Validation failed; the wizard moved to `step`.
    Invalid { step: usize },
    /// The profile gate is closed.
    Blocked,
    /// The profile check has not reported yet; nothing was sent.
    AwaitingProfile,
}

/// Something the UI should react to, returned from polling.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    Succeeded(SubmittedRecord),
    Failed(SubmissionError),
    /// The success delay elapsed, the callback fired and the wizard reset.
    Completed(SubmittedRecord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    /// 1-indexed, within `1..=total_steps`.
    pub current_step: usize,
    pub fields: FormFields,
    pub errors: ValidationErrors,
    pub status: WizardStatus,
    pub submit_error: Option<String>,
}

impl WizardState {
    fn initial(schema: &FormSchema) -> Self {
        Self {
            current_step: 1,
            fields: schema.initial_fields(),
            errors: ValidationErrors::new(),
            status: WizardStatus::Idle,
            submit_error: None,
        }
    }
}

pub type CompletionCallback = Box<dyn FnMut(&SubmittedRecord) + Send>;

pub struct WizardController {
    schema: &'static FormSchema,
    mode: WizardMode,
    gateway: Arc<dyn SubmissionGateway>,
    state: WizardState,
    media: Option<MediaStagingArea>,
    gate: ProfileGate,
    pending: Option<JoinHandle<GatewayResult<SubmittedRecord>>>,
    succeeded: Option<(Instant, SubmittedRecord)>,
    success_delay: Duration,
    on_complete: Option<CompletionCallback>,
}

impl WizardController {
    /// A creation wizard. The profile gate starts unchecked.
    pub fn new(schema: &'static FormSchema, gateway: Arc<dyn SubmissionGateway>) -> Self {
        Self {
            schema,
            mode: WizardMode::Create,
            gateway,
            state: WizardState::initial(schema),
            media: None,
            gate: ProfileGate::Unchecked,
            pending: None,
            succeeded: None,
            success_delay: DEFAULT_SUCCESS_DELAY,
            on_complete: None,
        }
    }

    /// An edit wizard prefilled from `record`. Edits skip the profile gate.
    pub fn for_edit(
        schema: &'static FormSchema,
        gateway: Arc<dyn SubmissionGateway>,
        record: &RequestRecord,
    ) -> Self {
        let mut controller = Self::new(schema, gateway);
        controller.mode = WizardMode::Edit {
            id: record.id.clone(),
        };
        controller.gate = ProfileGate::Ready;
        for (name, value) in record.to_fields().iter() {
            if schema.field(name).is_some() {
                controller.state.fields.set(name.clone(), value.clone());
            }
        }
        controller
    }

    /// Attach a media staging area. Ignored for schemas without media and in
    /// edit mode.
    pub fn with_media(mut self, provider: Arc<dyn PreviewProvider>) -> Self {
        if self.schema.accepts_media && self.mode == WizardMode::Create {
            self.media = Some(MediaStagingArea::new(provider));
        }
        self
    }

    pub fn with_success_delay(mut self, delay: Duration) -> Self {
        self.success_delay = delay;
        self
    }

    pub fn on_complete(mut self, callback: impl FnMut(&SubmittedRecord) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn schema(&self) -> &'static FormSchema {
        self.schema
    }

    pub fn mode(&self) -> &WizardMode {
        &self.mode
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn gate(&self) -> &ProfileGate {
        &self.gate
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.schema.total_steps()
    }

    pub fn is_last_step(&self) -> bool {
        self.state.current_step >= self.total_steps()
    }

    pub fn status(&self) -> WizardStatus {
        self.state.status
    }

    pub fn media(&self) -> Option<&MediaStagingArea> {
        self.media.as_ref()
    }

    pub fn gateway(&self) -> Arc<dyn SubmissionGateway> {
        Arc::clone(&self.gateway)
    }

    /// The record shown during the success delay.
    pub fn succeeded_record(&self) -> Option<&SubmittedRecord> {
        self.succeeded.as_ref().map(|(_, record)| record)
    }

    // ── Field editing ───────────────────────────────────────────────────

    /// Set a field and clear its error. Text sent to a list field is decoded
    /// as a JSON array so list fields stay lists.
    pub fn update_field(&mut self, name: &str, value: impl Into<FieldValue>) {
        let mut value = value.into();
        if let (Some(spec), FieldValue::Text(raw)) = (self.schema.field(name), &value) {
            if spec.is_list() {
                value = FieldValue::List(lenient::parse_list(raw));
            }
        }
        self.state.fields.set(name, value);
        self.state.errors.remove(name);
    }

    /// Toggle `value` in a multi-select field and clear its error.
    pub fn toggle_multi_value(&mut self, name: &str, value: &str) {
        let next = toggle(self.state.fields.list(name), value);
        self.state.fields.set(name, next);
        self.state.errors.remove(name);
    }

    pub fn stage_media(&mut self, files: impl IntoIterator<Item = StagedFile>) {
        if let Some(media) = self.media.as_mut() {
            media.add(files);
        }
    }

    pub fn unstage_media(&mut self, index: usize) -> Option<StagedFile> {
        self.media.as_mut().and_then(|media| media.remove(index))
    }

    // ── Navigation ──────────────────────────────────────────────────────

    /// Validate the current step and advance when it is clean. Returns
    /// whether the step was accepted.
    pub fn go_next(&mut self) -> bool {
        let errors = validate_step(self.schema, self.state.current_step, &self.state.fields);
        if !errors.is_empty() {
            tracing::debug!(step = self.state.current_step, errors = errors.len(), "Step rejected");
            self.state.errors = errors;
            return false;
        }
        self.state.errors.clear();
        self.state.current_step = (self.state.current_step + 1).min(self.total_steps());
        true
    }

    /// Step back without validating. Errors are kept.
    pub fn go_prev(&mut self) {
        self.state.current_step = self.state.current_step.saturating_sub(1).max(1);
    }

    // ── Submission ──────────────────────────────────────────────────────

    /// Validate every step and spawn the submission. Must be called inside a
    /// Tokio runtime.
    pub fn submit(&mut self) -> SubmitOutcome {
        if matches!(
            self.state.status,
            WizardStatus::Submitting | WizardStatus::Succeeded
        ) {
            return SubmitOutcome::AlreadySubmitting;
        }
        match self.gate {
            ProfileGate::Blocked { .. } => return SubmitOutcome::Blocked,
            ProfileGate::Unchecked => return SubmitOutcome::AwaitingProfile,
            ProfileGate::Ready => {}
        }

        let (errors, first_failing) = validate_all(self.schema, &self.state.fields);
        if let Some(step) = first_failing {
            tracing::debug!(step, errors = errors.len(), "Submission rejected by validation");
            self.state.errors = errors;
            self.state.current_step = step;
            return SubmitOutcome::Invalid { step };
        }

        self.state.errors.clear();
        self.state.submit_error = None;
        self.state.status = WizardStatus::Submitting;

        let target = self.target();
        let payload = build_payload(self.schema, &self.state.fields);
        let files = self.media.as_ref().map(MediaStagingArea::files).unwrap_or_default();
        let gateway = Arc::clone(&self.gateway);

        tracing::info!(?target, media = files.len(), "Submitting wizard");
        self.pending = Some(tokio::spawn(async move {
            gateway::send(gateway.as_ref(), target, payload, files).await
        }));
        SubmitOutcome::Started
    }

    fn target(&self) -> SubmissionTarget {
        match (&self.mode, self.schema.kind) {
            (WizardMode::Edit { id }, _) => SubmissionTarget::UpdateRequest { id: id.clone() },
            (WizardMode::Create, FormKind::DeveloperRequest) => SubmissionTarget::CreateRequest,
            (WizardMode::Create, FormKind::JobPosting) => SubmissionTarget::CreateJob,
        }
    }

    /// Collect a finished submission and fire completion once the success
    /// delay has elapsed. Never blocks.
    pub fn poll(&mut self) -> Option<WizardEvent> {
        self.poll_at(Instant::now())
    }

    /// [`poll`](Self::poll) against an explicit clock.
    pub fn poll_at(&mut self, now: Instant) -> Option<WizardEvent> {
        if self.pending.as_ref().is_some_and(JoinHandle::is_finished) {
            if let Some(joined) = self.pending.take().and_then(FutureExt::now_or_never) {
                return Some(self.finish(joined, now));
            }
        }

        let due = self
            .succeeded
            .as_ref()
            .is_some_and(|(at, _)| now.saturating_duration_since(*at) >= self.success_delay);
        if due {
            return self.complete_now();
        }
        None
    }

    /// Fire completion immediately for a success still inside its display
    /// delay. Used when the wizard is dismissed early.
    pub fn complete_now(&mut self) -> Option<WizardEvent> {
        let (_, record) = self.succeeded.take()?;
        if let Some(callback) = self.on_complete.as_mut() {
            callback(&record);
        }
        self.reset();
        Some(WizardEvent::Completed(record))
    }

    /// Await the in-flight submission, if any, and apply its result.
    pub async fn wait_for_submission(&mut self) -> Option<WizardEvent> {
        let handle = self.pending.take()?;
        let joined = handle.await;
        Some(self.finish(joined, Instant::now()))
    }

    fn finish(
        &mut self,
        joined: Result<GatewayResult<SubmittedRecord>, JoinError>,
        now: Instant,
    ) -> WizardEvent {
        let result = joined.unwrap_or_else(|e| {
            if e.is_cancelled() {
                Err(SubmissionError::Cancelled)
            } else {
                Err(SubmissionError::Network(format!("submission task failed: {e}")))
            }
        });

        match result {
            Ok(record) => {
                tracing::info!(id = %record.id(), "Submission succeeded");
                self.state.status = WizardStatus::Succeeded;
                self.succeeded = Some((now, record.clone()));
                WizardEvent::Succeeded(record)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Submission failed");
                let message = err.user_message();
                self.state.status = WizardStatus::Failed;
                self.state.submit_error = Some(message.clone());
                self.state
                    .errors
                    .insert(SUBMIT_ERROR_KEY.to_string(), message.clone());
                if err.redirect_reason() {
                    self.gate = ProfileGate::Blocked { message };
                }
                WizardEvent::Failed(err)
            }
        }
    }

    /// Abort an in-flight submission. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                handle.abort();
                self.state.status = WizardStatus::Idle;
                tracing::info!("Submission cancelled");
                true
            }
            None => false,
        }
    }

    /// Back to the empty template on step 1. Staged media are released.
    pub fn reset(&mut self) {
        self.cancel();
        self.state = WizardState::initial(self.schema);
        self.succeeded = None;
        if let Some(media) = self.media.as_mut() {
            media.dispose_all();
        }
    }

    // ── Profile gate ────────────────────────────────────────────────────

    /// Run the profile-completeness check. Edit wizards are always ready.
    pub async fn refresh_gate(&mut self) -> &ProfileGate {
        if matches!(self.mode, WizardMode::Edit { .. }) {
            self.gate = ProfileGate::Ready;
            return &self.gate;
        }
        match self.gateway.check_profile().await {
            Ok(status) => self.apply_profile_status(status),
            Err(e) => self.apply_profile_error(&e),
        }
        &self.gate
    }

    pub fn apply_profile_status(&mut self, status: ProfileStatus) {
        self.gate = if status.is_complete {
            ProfileGate::Ready
        } else {
            ProfileGate::Blocked {
                message: status
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_INCOMPLETE_MESSAGE.to_string()),
            }
        };
    }

    pub fn apply_profile_error(&mut self, err: &SubmissionError) {
        tracing::warn!(error = %err, "Profile check failed");
        self.gate = ProfileGate::Blocked {
            message: format!("Could not verify your profile: {err}"),
        };
    }
}

impl Drop for WizardController {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl fmt::Debug for WizardController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardController")
            .field("form", &self.schema.title)
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("gate", &self.gate)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}
