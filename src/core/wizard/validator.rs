//! Per-step validation.
//!
//! Validation runs on transitions only (next step, submit). Every violated field
//! of the step is reported at once so the UI can show all messages together.

use super::fields::{FieldValue, FormFields, ValidationErrors};
use super::schema::{FieldKind, FieldSpec, FormSchema};

pub const INVALID_OPTION_MESSAGE: &str = "Please select a valid option";

/// Check a single field against its spec.
pub fn validate_field(spec: &FieldSpec, fields: &FormFields) -> Option<String> {
    let value = fields.get(spec.name);
    let blank = value.map_or(true, FieldValue::is_blank);

    if blank {
        return spec.required.then(|| format!("{} is required", spec.label));
    }

    match spec.kind {
        FieldKind::Text | FieldKind::LongText => {
            let text = fields.text(spec.name).trim();
            if let Some(min) = spec.min_len {
                if text.chars().count() < min {
                    return Some(format!(
                        "{} must be at least {} characters",
                        spec.label, min
                    ));
                }
            }
            None
        }
        FieldKind::Choice(options) => {
            let text = fields.text(spec.name).trim();
            (!options.contains(&text)).then(|| INVALID_OPTION_MESSAGE.to_string())
        }
        // Catalogs only suggest values; records may carry others
        FieldKind::MultiSelect(_) => None,
    }
}

/// Validate one 1-indexed step. Unknown steps have no rules.
pub fn validate_step(schema: &FormSchema, step: usize, fields: &FormFields) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if let Some(step) = schema.step(step) {
        for spec in step.fields {
            if let Some(message) = validate_field(spec, fields) {
                errors.insert(spec.name.to_string(), message);
            }
        }
    }
    errors
}

/// Validate every step, returning the merged errors and the first failing step.
pub fn validate_all(schema: &FormSchema, fields: &FormFields) -> (ValidationErrors, Option<usize>) {
    let mut errors = ValidationErrors::new();
    let mut first_failing = None;
    for step in 1..=schema.total_steps() {
        let step_errors = validate_step(schema, step, fields);
        if !step_errors.is_empty() && first_failing.is_none() {
            first_failing = Some(step);
        }
        errors.extend(step_errors);
    }
    (errors, first_failing)
}
