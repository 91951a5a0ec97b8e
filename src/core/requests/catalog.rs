//! Option catalogs and the two wizard schemas built from them.

use crate::core::wizard::fields::*;
use crate::core::wizard::schema::{FieldKind, FieldSpec, FormKind, FormSchema, StepSchema};

pub const PROJECT_TYPES: &[&str] = &[
    "website",
    "web-application",
    "mobile-app",
    "desktop-app",
    "api-backend",
    "data-analytics",
    "ai-ml",
    "other",
];

pub const TECHNOLOGY_OPTIONS: &[&str] = &[
    "React",
    "Vue",
    "Angular",
    "Node.js",
    "Python",
    "Django",
    "Java",
    "Spring",
    "Rust",
    "Go",
    "Flutter",
    "Swift",
    "Kotlin",
    "PostgreSQL",
    "MongoDB",
    "AWS",
    "Docker",
];

pub const EXPERIENCE_LEVELS: &[&str] = &["entry", "junior", "mid", "senior"];

pub const WORK_TYPES: &[&str] = &["full-time", "part-time", "contract", "freelance", "internship"];

pub const DURATIONS: &[&str] = &[
    "less-than-1-month",
    "1-3-months",
    "3-6-months",
    "6-12-months",
    "more-than-12-months",
    "ongoing",
];

pub const START_DATES: &[&str] = &["immediately", "within-2-weeks", "within-1-month", "flexible"];

pub const WORK_STYLES: &[&str] = &["remote", "onsite", "hybrid"];

pub const WORK_HOURS_OPTIONS: &[&str] = &["business-hours", "flexible", "evenings", "weekends"];

pub const TEAM_SIZES: &[&str] = &["solo", "2-5", "6-10", "10-plus"];

pub const LANGUAGE_OPTIONS: &[&str] = &[
    "English", "French", "German", "Spanish", "Arabic", "Mandarin", "Japanese",
];

pub const INDUSTRIES: &[&str] = &[
    "fintech",
    "healthcare",
    "education",
    "e-commerce",
    "media",
    "logistics",
    "government",
    "other",
];

pub const PRIORITIES: &[&str] = &["low", "normal", "high", "urgent"];

pub const JOB_TYPES: &[&str] = &["full-time", "part-time", "internship", "contract", "freelance"];

pub const MIN_DESCRIPTION_CHARS: usize = 20;

const REQUEST_STEPS: &[StepSchema] = &[
    StepSchema {
        title: "Project Info",
        fields: &[
            FieldSpec::new(PROJECT_TITLE, "Project title", FieldKind::Text).required(),
            FieldSpec::new(PROJECT_DESCRIPTION, "Project description", FieldKind::LongText)
                .required()
                .min_len(MIN_DESCRIPTION_CHARS),
            FieldSpec::new(PROJECT_TYPE, "Project type", FieldKind::Choice(PROJECT_TYPES))
                .required(),
        ],
    },
    StepSchema {
        title: "Technical Requirements",
        fields: &[
            FieldSpec::new(
                TECHNOLOGIES,
                "Technologies",
                FieldKind::MultiSelect(TECHNOLOGY_OPTIONS),
            ),
            FieldSpec::new(
                EXPERIENCE_LEVEL,
                "Experience level",
                FieldKind::Choice(EXPERIENCE_LEVELS),
            )
            .required(),
        ],
    },
    StepSchema {
        title: "Work Conditions",
        fields: &[
            FieldSpec::new(WORK_TYPE, "Work type", FieldKind::Choice(WORK_TYPES)).required(),
            FieldSpec::new(DURATION, "Duration", FieldKind::Choice(DURATIONS)).required(),
            FieldSpec::new(START_DATE, "Start date", FieldKind::Choice(START_DATES)).required(),
            FieldSpec::new(WORK_STYLE, "Work style", FieldKind::Choice(WORK_STYLES)).required(),
            FieldSpec::new(LOCATION, "Location", FieldKind::Text),
            FieldSpec::new(WORK_HOURS, "Work hours", FieldKind::Choice(WORK_HOURS_OPTIONS))
                .required(),
            FieldSpec::new(TEAM_SIZE, "Team size", FieldKind::Choice(TEAM_SIZES)).required(),
        ],
    },
    StepSchema {
        title: "Preferences",
        fields: &[
            FieldSpec::new(
                COMMUNICATION_LANGUAGES,
                "Communication languages",
                FieldKind::MultiSelect(LANGUAGE_OPTIONS),
            ),
            FieldSpec::new(INDUSTRY, "Industry", FieldKind::Choice(INDUSTRIES)),
            FieldSpec::new(PRIORITY, "Priority", FieldKind::Choice(PRIORITIES))
                .default_value("normal"),
            FieldSpec::new(BUDGET_RANGE, "Budget range", FieldKind::Text),
        ],
    },
];

/// Four-step developer request wizard.
pub const DEVELOPER_REQUEST_FORM: FormSchema = FormSchema {
    kind: FormKind::DeveloperRequest,
    title: "Request a Developer",
    steps: REQUEST_STEPS,
    accepts_media: false,
};

const JOB_STEPS: &[StepSchema] = &[
    StepSchema {
        title: "Job Details",
        fields: &[
            FieldSpec::new(TITLE, "Job title", FieldKind::Text).required(),
            FieldSpec::new(DESCRIPTION, "Job description", FieldKind::LongText)
                .required()
                .min_len(MIN_DESCRIPTION_CHARS),
            FieldSpec::new(JOB_TYPE, "Job type", FieldKind::Choice(JOB_TYPES)).required(),
        ],
    },
    StepSchema {
        title: "Requirements",
        fields: &[
            FieldSpec::new(
                EXPERIENCE_LEVEL,
                "Experience level",
                FieldKind::Choice(EXPERIENCE_LEVELS),
            )
            .required(),
            FieldSpec::new(
                TECHNOLOGIES,
                "Technologies",
                FieldKind::MultiSelect(TECHNOLOGY_OPTIONS),
            ),
            FieldSpec::new(LOCATION, "Location", FieldKind::Text),
            FieldSpec::new(SALARY_RANGE, "Salary range", FieldKind::Text),
        ],
    },
    StepSchema {
        title: "Media",
        fields: &[],
    },
];

/// Three-step job posting wizard; its last step stages media files.
pub const JOB_POSTING_FORM: FormSchema = FormSchema {
    kind: FormKind::JobPosting,
    title: "Post a Job",
    steps: JOB_STEPS,
    accepts_media: true,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_form_shape() {
        assert_eq!(DEVELOPER_REQUEST_FORM.total_steps(), 4);
        assert_eq!(DEVELOPER_REQUEST_FORM.step_of(TEAM_SIZE), Some(3));
        assert_eq!(
            DEVELOPER_REQUEST_FORM.field(PRIORITY).and_then(|f| f.default),
            Some("normal")
        );
        assert!(DEVELOPER_REQUEST_FORM.field(TECHNOLOGIES).unwrap().is_list());
        assert!(DEVELOPER_REQUEST_FORM
            .field(COMMUNICATION_LANGUAGES)
            .unwrap()
            .is_list());
    }

    #[test]
    fn test_job_form_accepts_media() {
        assert!(JOB_POSTING_FORM.accepts_media);
        assert!(!DEVELOPER_REQUEST_FORM.accepts_media);
        assert_eq!(JOB_POSTING_FORM.step(3).map(|s| s.fields.len()), Some(0));
    }
}
