//! Records owned by the backend, as the wizards read them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient;
use crate::core::wizard::fields::*;

/// Review state of a developer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Reviewing,
    Viewed,
    Archived,
}

impl RequestStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Reviewing => "reviewing",
            RequestStatus::Viewed => "viewed",
            RequestStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

/// A developer request as stored by the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestRecord {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    pub project_title: String,
    pub project_description: String,
    pub project_type: String,
    #[serde(deserialize_with = "lenient::list")]
    pub technologies: Vec<String>,
    pub experience_level: String,
    pub work_type: String,
    pub duration: String,
    pub start_date: String,
    pub work_style: String,
    pub location: Option<String>,
    pub work_hours: String,
    pub team_size: String,
    #[serde(deserialize_with = "lenient::list")]
    pub communication_languages: Vec<String>,
    pub industry: Option<String>,
    pub priority: Priority,
    pub budget_range: Option<String>,
    pub status: RequestStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
}

impl RequestRecord {
    /// Wizard fields prefilled from this record, for the edit flow.
    pub fn to_fields(&self) -> FormFields {
        let mut fields = FormFields::new();
        fields.set(PROJECT_TITLE, self.project_title.as_str());
        fields.set(PROJECT_DESCRIPTION, self.project_description.as_str());
        fields.set(PROJECT_TYPE, self.project_type.as_str());
        fields.set(TECHNOLOGIES, self.technologies.clone());
        fields.set(EXPERIENCE_LEVEL, self.experience_level.as_str());
        fields.set(WORK_TYPE, self.work_type.as_str());
        fields.set(DURATION, self.duration.as_str());
        fields.set(START_DATE, self.start_date.as_str());
        fields.set(WORK_STYLE, self.work_style.as_str());
        fields.set(LOCATION, self.location.clone().unwrap_or_default());
        fields.set(WORK_HOURS, self.work_hours.as_str());
        fields.set(TEAM_SIZE, self.team_size.as_str());
        fields.set(COMMUNICATION_LANGUAGES, self.communication_languages.clone());
        fields.set(INDUSTRY, self.industry.clone().unwrap_or_default());
        fields.set(PRIORITY, self.priority.as_str());
        fields.set(BUDGET_RANGE, self.budget_range.clone().unwrap_or_default());
        fields
    }
}

/// A job posting as stored by the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobRecord {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub job_type: String,
    pub experience_level: String,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub technologies: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub media: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_record_normalizes_string_lists() {
        let record: RequestRecord = serde_json::from_value(json!({
            "id": 12,
            "projectTitle": "Clinic portal",
            "technologies": "[\"React\",\"Django\"]",
            "communicationLanguages": "not json",
            "status": "reviewing",
            "priority": "high",
            "createdAt": "2026-03-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(record.id, "12");
        assert_eq!(record.technologies, ["React", "Django"]);
        assert!(record.communication_languages.is_empty());
        assert_eq!(record.status, RequestStatus::Reviewing);
        assert_eq!(record.priority, Priority::High);
        assert!(record.created_at.is_some());
    }

    #[test]
    fn test_missing_fields_default() {
        let record: RequestRecord = serde_json::from_value(json!({ "id": "r-1" })).unwrap();
        assert_eq!(record.status, RequestStatus::Pending);
        assert_eq!(record.priority, Priority::Normal);
        assert!(record.technologies.is_empty());
    }

    #[test]
    fn test_to_fields_keeps_lists_as_lists() {
        let record = RequestRecord {
            project_title: "Shop".into(),
            technologies: vec!["Vue".into()],
            communication_languages: vec!["French".into()],
            location: None,
            ..Default::default()
        };
        let fields = record.to_fields();
        assert_eq!(fields.list(TECHNOLOGIES), ["Vue"]);
        assert_eq!(fields.list(COMMUNICATION_LANGUAGES), ["French"]);
        assert_eq!(fields.text(LOCATION), "");
        assert_eq!(fields.text(PRIORITY), "normal");
    }

    #[test]
    fn test_job_record_media_from_string() {
        let job: JobRecord = serde_json::from_value(json!({
            "id": "j-9",
            "title": "Intern",
            "media": "[\"a.png\",\"b.jpg\"]"
        }))
        .unwrap();
        assert_eq!(job.media, ["a.png", "b.jpg"]);
    }
}
