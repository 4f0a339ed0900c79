//! Non-fatal validation of a resolved record.
//!
//! Each rule is a free function returning a [`ValidationOutcome`]. Invalid
//! outcomes become warnings on the extraction result; they never stop output.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::metadata::config::ValidationConfig;
use crate::model::DocumentMetadata;

/// Identifies which rule produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationRule {
    RequireTitle,
    RequireAuthor,
    MaxKeywordLength,
    MaxSubjectLength,
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationRule::RequireTitle => "requireTitle",
            ValidationRule::RequireAuthor => "requireAuthor",
            ValidationRule::MaxKeywordLength => "maxKeywordLength",
            ValidationRule::MaxSubjectLength => "maxSubjectLength",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationOutcome {
    Ok,
    Invalid {
        rule: ValidationRule,
        message: String,
    },
}

impl ValidationOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, ValidationOutcome::Ok)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Ok => None,
            ValidationOutcome::Invalid { message, .. } => Some(message),
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |value| value.trim().is_empty())
}

pub fn check_required_title(metadata: &DocumentMetadata, config: &ValidationConfig) -> ValidationOutcome {
    if config.require_title && is_blank(metadata.title.as_deref()) {
        return ValidationOutcome::Invalid {
            rule: ValidationRule::RequireTitle,
            message: "Title is required but was not found".to_string(),
        };
    }
    ValidationOutcome::Ok
}

pub fn check_required_author(metadata: &DocumentMetadata, config: &ValidationConfig) -> ValidationOutcome {
    if config.require_author && is_blank(metadata.author.as_deref()) {
        return ValidationOutcome::Invalid {
            rule: ValidationRule::RequireAuthor,
            message: "Author is required but was not found".to_string(),
        };
    }
    ValidationOutcome::Ok
}

pub fn check_keyword_length(metadata: &DocumentMetadata, config: &ValidationConfig) -> ValidationOutcome {
    match metadata.keywords.as_deref() {
        Some(keywords) if keywords.chars().count() > config.max_keyword_length => {
            ValidationOutcome::Invalid {
                rule: ValidationRule::MaxKeywordLength,
                message: format!(
                    "Keywords exceed maximum length of {} characters",
                    config.max_keyword_length
                ),
            }
        }
        _ => ValidationOutcome::Ok,
    }
}

pub fn check_subject_length(metadata: &DocumentMetadata, config: &ValidationConfig) -> ValidationOutcome {
    match metadata.subject.as_deref() {
        Some(subject) if subject.chars().count() > config.max_subject_length => {
            ValidationOutcome::Invalid {
                rule: ValidationRule::MaxSubjectLength,
                message: format!(
                    "Subject exceeds maximum length of {} characters",
                    config.max_subject_length
                ),
            }
        }
        _ => ValidationOutcome::Ok,
    }
}

/// Runs every rule in a fixed order.
pub fn validate_metadata(metadata: &DocumentMetadata, config: &ValidationConfig) -> Vec<ValidationOutcome> {
    vec![
        check_required_title(metadata, config),
        check_required_author(metadata, config),
        check_keyword_length(metadata, config),
        check_subject_length(metadata, config),
    ]
}

/// Messages of the failed rules, ready to append to `warnings`.
pub fn validation_warnings(metadata: &DocumentMetadata, config: &ValidationConfig) -> Vec<String> {
    validate_metadata(metadata, config)
        .into_iter()
        .filter_map(|outcome| match outcome {
            ValidationOutcome::Ok => None,
            ValidationOutcome::Invalid { message, .. } => Some(message),
        })
        .collect()
}
