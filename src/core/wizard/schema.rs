//! Static step and field definitions that drive a wizard.

use super::fields::{FieldValue, FormFields};

/// Which backend resource a schema produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    DeveloperRequest,
    JobPosting,
}

/// How a field is edited and what values it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line free text.
    Text,
    /// Multi-line free text.
    LongText,
    /// One value from a fixed set.
    Choice(&'static [&'static str]),
    /// Any subset of a fixed set, stored as a list.
    MultiSelect(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Minimum length in characters, checked after trimming.
    pub min_len: Option<usize>,
    /// Value sent when the field is left empty.
    pub default: Option<&'static str>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            min_len: None,
            default: None,
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    pub const fn min_len(self, len: usize) -> Self {
        Self {
            min_len: Some(len),
            ..self
        }
    }

    pub const fn default_value(self, value: &'static str) -> Self {
        Self {
            default: Some(value),
            ..self
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, FieldKind::MultiSelect(_))
    }

    /// Options for choice and multi-select fields; empty for free text.
    pub fn options(&self) -> &'static [&'static str] {
        match self.kind {
            FieldKind::Choice(options) | FieldKind::MultiSelect(options) => options,
            FieldKind::Text | FieldKind::LongText => &[],
        }
    }

    /// Empty value this field starts with.
    pub fn empty_value(&self) -> FieldValue {
        if self.is_list() {
            FieldValue::List(Vec::new())
        } else {
            FieldValue::Text(String::new())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSchema {
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSchema {
    pub kind: FormKind,
    pub title: &'static str,
    pub steps: &'static [StepSchema],
    /// Whether a media staging area accompanies the final step.
    pub accepts_media: bool,
}

impl FormSchema {
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Step definition for a 1-indexed step number.
    pub fn step(&self, step: usize) -> Option<&'static StepSchema> {
        step.checked_sub(1).and_then(|idx| self.steps.get(idx))
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.steps.iter().flat_map(|step| step.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().find(|spec| spec.name == name)
    }

    /// 1-indexed step that owns `name`.
    pub fn step_of(&self, name: &str) -> Option<usize> {
        self.steps
            .iter()
            .position(|step| step.fields.iter().any(|spec| spec.name == name))
            .map(|idx| idx + 1)
    }

    /// The empty template every wizard starts from and resets to.
    pub fn initial_fields(&self) -> FormFields {
        let mut fields = FormFields::new();
        for spec in self.fields() {
            fields.set(spec.name, spec.empty_value());
        }
        fields
    }
}
