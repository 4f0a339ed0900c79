//! Extraction configuration and its built-in defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::metadata::fields::classify;
use crate::model::DocumentMetadata;

/// Title value in the default configuration that stands for "no title yet".
pub const TITLE_PLACEHOLDER: &str = "Untitled Document";
/// Author value in the default configuration that stands for "no author yet".
pub const AUTHOR_PLACEHOLDER: &str = "Unknown Author";

/// Errors raised while loading or checking a [`MetadataConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration document is not valid JSON for this schema
    #[error("Failed to parse metadata config: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration parsed but violates a constraint
    #[error("Invalid metadata config: {0}")]
    Invalid(String),
}

/// Top-level switches and tables controlling metadata extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataConfig {
    /// Global kill-switch. When `false` only defaults are applied.
    pub enabled: bool,

    pub auto_extraction: AutoExtractionConfig,

    /// Values used when nothing better is found.
    pub defaults: DocumentMetadata,

    /// Frontmatter key → canonical field name.
    pub frontmatter_mapping: BTreeMap<String, String>,

    pub validation: ValidationConfig,
}

/// Per-source extraction flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoExtractionConfig {
    pub from_frontmatter: bool,
    pub from_content: bool,
    pub from_filename: bool,
    pub compute_stats: bool,
}

/// Non-fatal validation rules applied to the merged record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationConfig {
    pub require_title: bool,
    pub require_author: bool,
    pub max_keyword_length: usize,
    pub max_subject_length: usize,
}

impl Default for AutoExtractionConfig {
    fn default() -> Self {
        Self {
            from_frontmatter: true,
            from_content: true,
            from_filename: true,
            compute_stats: true,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            require_title: false,
            require_author: false,
            max_keyword_length: 255,
            max_subject_length: 512,
        }
    }
}

const DEFAULT_FRONTMATTER_MAPPING: &[(&str, &str)] = &[
    ("title", "title"),
    ("author", "author"),
    ("authors", "author"),
    ("subject", "subject"),
    ("description", "subject"),
    ("summary", "subject"),
    ("keywords", "keywords"),
    ("tags", "keywords"),
    ("creator", "creator"),
    ("producer", "producer"),
    ("date", "creationDate"),
    ("created", "creationDate"),
    ("creationDate", "creationDate"),
    ("modified", "modDate"),
    ("updated", "modDate"),
    ("lastModified", "modDate"),
    ("modDate", "modDate"),
    ("organization", "organization"),
    ("organisation", "organization"),
    ("company", "organization"),
    ("department", "department"),
    ("team", "team"),
    ("category", "category"),
    ("version", "version"),
    ("language", "language"),
    ("lang", "language"),
    ("copyright", "copyright"),
    ("license", "license"),
    ("confidentiality", "confidentiality"),
    ("classification", "confidentiality"),
    ("email", "email"),
    ("website", "website"),
    ("url", "website"),
    ("format", "format"),
    ("custom", "custom"),
];

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_extraction: AutoExtractionConfig::default(),
            defaults: DocumentMetadata {
                title: Some(TITLE_PLACEHOLDER.to_string()),
                author: Some(AUTHOR_PLACEHOLDER.to_string()),
                creator: Some("Markdown PDF Converter".to_string()),
                producer: Some("markdown-pdf-metadata".to_string()),
                language: Some("en".to_string()),
                ..Default::default()
            },
            frontmatter_mapping: DEFAULT_FRONTMATTER_MAPPING
                .iter()
                .map(|(key, field)| (key.to_string(), field.to_string()))
                .collect(),
            validation: ValidationConfig::default(),
        }
    }
}

impl MetadataConfig {
    /// Parses a JSON configuration document. Missing keys take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Checks the configuration for entries that extraction would silently ignore.
    ///
    /// Extraction itself never calls this; unknown mapping targets are dropped
    /// there without comment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, target) in &self.frontmatter_mapping {
            if classify(target).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "frontmatter key '{key}' maps to unknown field '{target}'"
                )));
            }
        }
        if self.validation.max_keyword_length == 0 {
            return Err(ConfigError::Invalid(
                "maxKeywordLength must be greater than zero".to_string(),
            ));
        }
        if self.validation.max_subject_length == 0 {
            return Err(ConfigError::Invalid(
                "maxSubjectLength must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
