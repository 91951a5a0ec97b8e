//! Request Wizard State Machine
//!
//! Drives the multi-step forms employers use to request a developer or post a
//! job.
//!
//! # Overview
//!
//! A wizard is a [`FormSchema`] (ordered steps of typed fields) plus a
//! [`WizardController`] holding the live state:
//! 1. Editing - `update_field` / `toggle_multi_value` change values and clear
//!    that field's error
//! 2. Navigation - `go_next` validates the current step, `go_prev` never does
//! 3. Submission - `submit` validates every step, then hands a normalized
//!    payload to the [`SubmissionGateway`](crate::core::gateway::SubmissionGateway)
//! 4. Completion - after the success delay the completion callback fires and
//!    the wizard resets
//!
//! # Design Principles
//!
//! - **Declarative**: steps and rules live in the schema, not in view code
//! - **Total**: validation reports every problem on a step at once
//! - **Typed lists**: multi-select values are `Vec<String>` end to end

pub mod controller;
pub mod fields;
pub mod multi_select;
pub mod schema;
pub mod validator;

pub use controller::{
    CompletionCallback, ProfileGate, SubmitOutcome, WizardController, WizardEvent, WizardMode,
    WizardState, WizardStatus, DEFAULT_SUCCESS_DELAY,
};
pub use fields::{FieldValue, FormFields, ValidationErrors, SUBMIT_ERROR_KEY};
pub use multi_select::toggle;
pub use schema::{FieldKind, FieldSpec, FormKind, FormSchema, StepSchema};
pub use validator::{validate_all, validate_field, validate_step};
