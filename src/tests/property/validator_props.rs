//! Property-based tests for step validation
//!
//! Tests invariants:
//! - Descriptions shorter than the minimum fail, longer ones pass the length rule
//! - Whitespace-only required text is treated as missing
//! - Reported errors always belong to the validated step

use proptest::prelude::*;

use crate::core::requests::catalog::{DEVELOPER_REQUEST_FORM, MIN_DESCRIPTION_CHARS};
use crate::core::wizard::fields::*;
use crate::core::wizard::validator::validate_step;

fn step_one(title: &str, description: &str) -> FormFields {
    let mut fields = DEVELOPER_REQUEST_FORM.initial_fields();
    fields.set(PROJECT_TITLE, title);
    fields.set(PROJECT_DESCRIPTION, description);
    fields.set(PROJECT_TYPE, "website");
    fields
}

proptest! {
    /// Property: character count after trimming decides the length rule
    #[test]
    fn prop_description_length_rule(
        description in "[a-zA-Zé ]{0,40}",
    ) {
        let errors = validate_step(&DEVELOPER_REQUEST_FORM, 1, &step_one("Site", &description));
        let chars = description.trim().chars().count();

        if chars == 0 {
            prop_assert_eq!(
                errors.get(PROJECT_DESCRIPTION).map(String::as_str),
                Some("Project description is required")
            );
        } else if chars < MIN_DESCRIPTION_CHARS {
            prop_assert!(errors[PROJECT_DESCRIPTION].contains("at least 20 characters"));
        } else {
            prop_assert!(!errors.contains_key(PROJECT_DESCRIPTION));
        }
    }

    /// Property: whitespace-only titles are missing
    #[test]
    fn prop_whitespace_title_is_required(
        title in "[ \t\n]{0,10}",
    ) {
        let errors = validate_step(
            &DEVELOPER_REQUEST_FORM,
            1,
            &step_one(&title, "A description that is long enough"),
        );
        prop_assert_eq!(
            errors.get(PROJECT_TITLE).map(String::as_str),
            Some("Project title is required")
        );
        prop_assert_eq!(errors.len(), 1);
    }

    /// Property: errors name only fields of the step being validated
    #[test]
    fn prop_errors_stay_within_step(
        step in 1usize..=4,
        text in ".{0,30}",
    ) {
        let mut fields = FormFields::new();
        for spec in DEVELOPER_REQUEST_FORM.fields() {
            if !spec.is_list() {
                fields.set(spec.name, text.as_str());
            }
        }

        let errors = validate_step(&DEVELOPER_REQUEST_FORM, step, &fields);
        for name in errors.keys() {
            prop_assert_eq!(DEVELOPER_REQUEST_FORM.step_of(name), Some(step));
        }
    }
}
