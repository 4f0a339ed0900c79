//! Per-document extraction input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::metadata::config::MetadataConfig;

/// Parsed frontmatter keyed by the author's original keys.
pub type Frontmatter = BTreeMap<String, FrontmatterValue>;

/// A frontmatter value as produced by any YAML or JSON reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrontmatterValue {
    Null,
    Bool(bool),
    Number(f64),
    Date(DateTime<Utc>),
    String(String),
    List(Vec<FrontmatterValue>),
    Map(BTreeMap<String, FrontmatterValue>),
}

impl FrontmatterValue {
    /// Scalar text rendering. Lists, maps and null have none.
    pub fn as_scalar_text(&self) -> Option<String> {
        match self {
            FrontmatterValue::String(text) => Some(text.clone()),
            FrontmatterValue::Bool(flag) => Some(flag.to_string()),
            FrontmatterValue::Number(number) => Some(format_number(*number)),
            FrontmatterValue::Date(date) => Some(crate::model::to_iso_string(date)),
            FrontmatterValue::Null | FrontmatterValue::List(_) | FrontmatterValue::Map(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FrontmatterValue::Null => serde_json::Value::Null,
            FrontmatterValue::Bool(flag) => serde_json::Value::Bool(*flag),
            FrontmatterValue::Number(number) => serde_json::Number::from_f64(*number)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FrontmatterValue::Date(date) => {
                serde_json::Value::String(crate::model::to_iso_string(date))
            }
            FrontmatterValue::String(text) => serde_json::Value::String(text.clone()),
            FrontmatterValue::List(items) => {
                serde_json::Value::Array(items.iter().map(FrontmatterValue::to_json).collect())
            }
            FrontmatterValue::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Renders whole numbers without a fractional part (`2.0` → `"2"`).
fn format_number(number: f64) -> String {
    if number.is_finite() && number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

impl From<serde_json::Value> for FrontmatterValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FrontmatterValue::Null,
            serde_json::Value::Bool(flag) => FrontmatterValue::Bool(flag),
            serde_json::Value::Number(number) => number
                .as_f64()
                .map(FrontmatterValue::Number)
                .unwrap_or(FrontmatterValue::Null),
            serde_json::Value::String(text) => FrontmatterValue::String(text),
            serde_json::Value::Array(items) => {
                FrontmatterValue::List(items.into_iter().map(FrontmatterValue::from).collect())
            }
            serde_json::Value::Object(map) => FrontmatterValue::Map(
                map.into_iter()
                    .map(|(key, value)| (key, FrontmatterValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_yaml::Value> for FrontmatterValue {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => FrontmatterValue::Null,
            serde_yaml::Value::Bool(flag) => FrontmatterValue::Bool(flag),
            serde_yaml::Value::Number(number) => number
                .as_f64()
                .map(FrontmatterValue::Number)
                .unwrap_or(FrontmatterValue::Null),
            serde_yaml::Value::String(text) => FrontmatterValue::String(text),
            serde_yaml::Value::Sequence(items) => {
                FrontmatterValue::List(items.into_iter().map(FrontmatterValue::from).collect())
            }
            serde_yaml::Value::Mapping(map) => FrontmatterValue::Map(
                map.into_iter()
                    .filter_map(|(key, value)| {
                        yaml_key(key).map(|key| (key, FrontmatterValue::from(value)))
                    })
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => FrontmatterValue::from(tagged.value),
        }
    }
}

/// Mapping keys are kept when they are scalars; complex keys are dropped.
fn yaml_key(key: serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(text) => Some(text),
        serde_yaml::Value::Bool(flag) => Some(flag.to_string()),
        serde_yaml::Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

impl From<&str> for FrontmatterValue {
    fn from(value: &str) -> Self {
        FrontmatterValue::String(value.to_string())
    }
}

impl From<String> for FrontmatterValue {
    fn from(value: String) -> Self {
        FrontmatterValue::String(value)
    }
}

/// Everything the pipeline needs to extract metadata for one document.
///
/// The markdown and frontmatter are supplied already read; nothing here
/// touches the filesystem.
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractionContext {
    pub markdown_content: String,
    pub file_path: Option<PathBuf>,
    pub frontmatter: Option<Frontmatter>,
    pub config: MetadataConfig,
    /// Fixed clock for generated dates; `None` means "now".
    pub generate_date: Option<DateTime<Utc>>,
}

impl MetadataExtractionContext {
    pub fn new(markdown_content: impl Into<String>, config: MetadataConfig) -> Self {
        Self {
            markdown_content: markdown_content.into(),
            config,
            ..Default::default()
        }
    }

    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_frontmatter(mut self, frontmatter: Frontmatter) -> Self {
        self.frontmatter = Some(frontmatter);
        self
    }

    pub fn with_generate_date(mut self, date: DateTime<Utc>) -> Self {
        self.generate_date = Some(date);
        self
    }

    /// File name without a trailing markdown extension.
    ///
    /// `Path::file_stem` is avoided because it would cut `doc_v2.1` down to `doc_v2`.
    pub fn document_stem(&self) -> Option<String> {
        let name = self.file_path.as_ref()?.file_name()?.to_string_lossy();
        let lower = name.to_ascii_lowercase();
        let stem = [".markdown", ".md"]
            .into_iter()
            .find(|ext| lower.ends_with(ext))
            .map(|ext| &name[..name.len() - ext.len()])
            .unwrap_or(name.as_ref());
        Some(stem.to_string())
    }
}
