//! Form field storage for the wizards.
//!
//! Values are either free text (also used for enumerated choices) or a list of
//! strings for multi-select fields. List fields never hold text inside a
//! [`FormFields`]; text arriving for a list field is decoded at the boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Developer request fields ────────────────────────────────────────────────

pub const PROJECT_TITLE: &str = "projectTitle";
pub const PROJECT_DESCRIPTION: &str = "projectDescription";
pub const PROJECT_TYPE: &str = "projectType";
pub const TECHNOLOGIES: &str = "technologies";
pub const EXPERIENCE_LEVEL: &str = "experienceLevel";
pub const WORK_TYPE: &str = "workType";
pub const DURATION: &str = "duration";
pub const START_DATE: &str = "startDate";
pub const WORK_STYLE: &str = "workStyle";
pub const LOCATION: &str = "location";
pub const WORK_HOURS: &str = "workHours";
pub const TEAM_SIZE: &str = "teamSize";
pub const COMMUNICATION_LANGUAGES: &str = "communicationLanguages";
pub const INDUSTRY: &str = "industry";
pub const PRIORITY: &str = "priority";
pub const BUDGET_RANGE: &str = "budgetRange";

// ── Job posting fields ──────────────────────────────────────────────────────

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const JOB_TYPE: &str = "jobType";
pub const SALARY_RANGE: &str = "salaryRange";
pub const MEDIA: &str = "media";

/// Key under which a failed submission's message is stored in the error map.
pub const SUBMIT_ERROR_KEY: &str = "submit";

/// Field-name to message map produced by validation.
pub type ValidationErrors = BTreeMap<String, String>;

/// A single form value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Empty after trimming (text) or with no entries (list).
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            FieldValue::Text(_) => None,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::List(value.into_iter().map(str::to_string).collect())
    }
}

/// The field map owned by a wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormFields(BTreeMap<String, FieldValue>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Text value of `name`; empty for unset or list-valued fields.
    pub fn text(&self, name: &str) -> &str {
        self.0
            .get(name)
            .and_then(FieldValue::as_text)
            .unwrap_or("")
    }

    /// List value of `name`; empty for unset or text-valued fields.
    pub fn list(&self, name: &str) -> &[String] {
        self.0
            .get(name)
            .and_then(FieldValue::as_list)
            .unwrap_or(&[])
    }

    pub fn is_blank(&self, name: &str) -> bool {
        self.0.get(name).map_or(true, FieldValue::is_blank)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
