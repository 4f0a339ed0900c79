//! Core data model: provenance-tagged entries, the per-source collection,
//! the resolved [`DocumentMetadata`] record and the result envelope.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::metadata::fields::{ComputedField, ExtendedField, FieldKey, StandardField};

/// Priority of statically configured defaults.
pub const PRIORITY_DEFAULT: u8 = 1;
/// Priority of weak inference (filename-derived title, version token, statistics).
pub const PRIORITY_INFERRED: u8 = 1;
/// Priority of strong inference (first heading, date token in filename).
pub const PRIORITY_DETECTED: u8 = 2;
/// Priority of explicit user authorship.
pub const PRIORITY_FRONTMATTER: u8 = 3;

// ============================================================================
// Entries
// ============================================================================

/// Provenance tag for a metadata entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataSource {
    Default,
    Frontmatter,
    Auto,
    Config,
    Cli,
}

/// A single metadata value of any field type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Flag(bool),
    Count(u64),
    Date(DateTime<Utc>),
    Text(String),
    Map(BTreeMap<String, serde_json::Value>),
}

impl MetadataValue {
    /// Text rendering of the value. Maps have no text form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            MetadataValue::Text(text) => Some(text.clone()),
            MetadataValue::Date(date) => Some(to_iso_string(date)),
            MetadataValue::Count(count) => Some(count.to_string()),
            MetadataValue::Flag(flag) => Some(flag.to_string()),
            MetadataValue::Map(_) => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            MetadataValue::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            MetadataValue::Count(count) => Some(*count),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            MetadataValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

/// ISO-8601 rendering with millisecond precision and a `Z` suffix.
pub fn to_iso_string(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A value together with where it came from and how strongly it is held.
///
/// Entries are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry<T = MetadataValue> {
    value: T,
    source: MetadataSource,
    priority: u8,
}

impl<T> MetadataEntry<T> {
    pub fn new(value: T, source: MetadataSource, priority: u8) -> Self {
        Self {
            value,
            source,
            priority,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn source(&self) -> MetadataSource {
        self.source
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

// ============================================================================
// Collection
// ============================================================================

/// Per-bucket source entries gathered by the extractors.
///
/// Entries are only ever added through the `offer_*` methods, which replace
/// an existing entry only when the new priority is strictly greater. Equal
/// priority keeps whichever entry arrived first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataCollection {
    standard: BTreeMap<StandardField, MetadataEntry>,
    extended: BTreeMap<ExtendedField, MetadataEntry>,
    computed: BTreeMap<ComputedField, MetadataEntry>,
}

fn offer_into<K: Ord>(map: &mut BTreeMap<K, MetadataEntry>, key: K, entry: MetadataEntry) -> bool {
    match map.get(&key) {
        Some(existing) if entry.priority() <= existing.priority() => false,
        _ => {
            map.insert(key, entry);
            true
        }
    }
}

impl MetadataCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers an entry for a classified field. Returns `true` if it was kept.
    pub fn offer(&mut self, field: FieldKey, entry: MetadataEntry) -> bool {
        match field {
            FieldKey::Standard(field) => self.offer_standard(field, entry),
            FieldKey::Extended(field) => self.offer_extended(field, entry),
        }
    }

    pub fn offer_standard(&mut self, field: StandardField, entry: MetadataEntry) -> bool {
        offer_into(&mut self.standard, field, entry)
    }

    pub fn offer_extended(&mut self, field: ExtendedField, entry: MetadataEntry) -> bool {
        offer_into(&mut self.extended, field, entry)
    }

    pub fn offer_computed(&mut self, field: ComputedField, entry: MetadataEntry) -> bool {
        offer_into(&mut self.computed, field, entry)
    }

    pub fn get(&self, field: FieldKey) -> Option<&MetadataEntry> {
        match field {
            FieldKey::Standard(field) => self.standard.get(&field),
            FieldKey::Extended(field) => self.extended.get(&field),
        }
    }

    pub fn standard(&self) -> &BTreeMap<StandardField, MetadataEntry> {
        &self.standard
    }

    pub fn extended(&self) -> &BTreeMap<ExtendedField, MetadataEntry> {
        &self.extended
    }

    pub fn computed(&self) -> &BTreeMap<ComputedField, MetadataEntry> {
        &self.computed
    }

    /// Total number of entries across all three buckets.
    pub fn len(&self) -> usize {
        self.standard.len() + self.extended.len() + self.computed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Resolved record
// ============================================================================

/// Fully resolved document metadata, one value per field and no provenance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentMetadata {
    // Standard PDF fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mod_date: Option<DateTime<Utc>>,

    // Extended fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidentiality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<BTreeMap<String, serde_json::Value>>,

    // Computed fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toc_depth: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_images: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_tables: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_code_blocks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_diagrams: Option<bool>,
}

impl DocumentMetadata {
    /// Writes a resolved standard field. Values of the wrong shape are ignored.
    pub fn set_standard(&mut self, field: StandardField, value: &MetadataValue) {
        match field {
            StandardField::Title => self.title = value.as_text(),
            StandardField::Author => self.author = value.as_text(),
            StandardField::Subject => self.subject = value.as_text(),
            StandardField::Keywords => self.keywords = value.as_text(),
            StandardField::Creator => self.creator = value.as_text(),
            StandardField::Producer => self.producer = value.as_text(),
            StandardField::CreationDate => self.creation_date = value.as_date(),
            StandardField::ModDate => self.mod_date = value.as_date(),
        }
    }

    pub fn set_extended(&mut self, field: ExtendedField, value: &MetadataValue) {
        let text = value.as_text();
        match field {
            ExtendedField::Organization => self.organization = text,
            ExtendedField::Department => self.department = text,
            ExtendedField::Team => self.team = text,
            ExtendedField::Category => self.category = text,
            ExtendedField::Version => self.version = text,
            ExtendedField::Language => self.language = text,
            ExtendedField::Copyright => self.copyright = text,
            ExtendedField::License => self.license = text,
            ExtendedField::Confidentiality => self.confidentiality = text,
            ExtendedField::Email => self.email = text,
            ExtendedField::Website => self.website = text,
            ExtendedField::Format => self.format = text,
            ExtendedField::Generator => self.generator = text,
            ExtendedField::Custom => {
                self.custom = match value {
                    MetadataValue::Map(map) => Some(map.clone()),
                    _ => None,
                }
            }
        }
    }

    pub fn set_computed(&mut self, field: ComputedField, value: &MetadataValue) {
        match field {
            ComputedField::WordCount => self.word_count = value.as_count(),
            ComputedField::PageCount => self.page_count = value.as_count(),
            ComputedField::TocDepth => self.toc_depth = value.as_count(),
            ComputedField::HasImages => self.has_images = value.as_flag(),
            ComputedField::HasTables => self.has_tables = value.as_flag(),
            ComputedField::HasCodeBlocks => self.has_code_blocks = value.as_flag(),
            ComputedField::HasDiagrams => self.has_diagrams = value.as_flag(),
        }
    }

    /// Every populated standard and extended field, in vocabulary order.
    ///
    /// Computed fields are not included; they are never user-supplied.
    pub fn supplied_fields(&self) -> Vec<(FieldKey, MetadataValue)> {
        let text = |field: FieldKey, value: &Option<String>| {
            value
                .as_ref()
                .map(|value| (field, MetadataValue::Text(value.clone())))
        };
        let date = |field: FieldKey, value: &Option<DateTime<Utc>>| {
            value
                .as_ref()
                .map(|value| (field, MetadataValue::Date(*value)))
        };

        [
            text(FieldKey::Standard(StandardField::Title), &self.title),
            text(FieldKey::Standard(StandardField::Author), &self.author),
            text(FieldKey::Standard(StandardField::Subject), &self.subject),
            text(FieldKey::Standard(StandardField::Keywords), &self.keywords),
            text(FieldKey::Standard(StandardField::Creator), &self.creator),
            text(FieldKey::Standard(StandardField::Producer), &self.producer),
            date(FieldKey::Standard(StandardField::CreationDate), &self.creation_date),
            date(FieldKey::Standard(StandardField::ModDate), &self.mod_date),
            text(FieldKey::Extended(ExtendedField::Organization), &self.organization),
            text(FieldKey::Extended(ExtendedField::Department), &self.department),
            text(FieldKey::Extended(ExtendedField::Team), &self.team),
            text(FieldKey::Extended(ExtendedField::Category), &self.category),
            text(FieldKey::Extended(ExtendedField::Version), &self.version),
            text(FieldKey::Extended(ExtendedField::Language), &self.language),
            text(FieldKey::Extended(ExtendedField::Copyright), &self.copyright),
            text(FieldKey::Extended(ExtendedField::License), &self.license),
            text(FieldKey::Extended(ExtendedField::Confidentiality), &self.confidentiality),
            text(FieldKey::Extended(ExtendedField::Email), &self.email),
            text(FieldKey::Extended(ExtendedField::Website), &self.website),
            text(FieldKey::Extended(ExtendedField::Format), &self.format),
            text(FieldKey::Extended(ExtendedField::Generator), &self.generator),
            self.custom.as_ref().map(|custom| {
                (
                    FieldKey::Extended(ExtendedField::Custom),
                    MetadataValue::Map(custom.clone()),
                )
            }),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Clears every extended field.
    pub fn clear_extended(&mut self) {
        self.organization = None;
        self.department = None;
        self.team = None;
        self.category = None;
        self.version = None;
        self.language = None;
        self.copyright = None;
        self.license = None;
        self.confidentiality = None;
        self.email = None;
        self.website = None;
        self.format = None;
        self.generator = None;
        self.custom = None;
    }

    /// Clears every computed field.
    pub fn clear_computed(&mut self) {
        self.word_count = None;
        self.page_count = None;
        self.toc_depth = None;
        self.has_images = None;
        self.has_tables = None;
        self.has_code_blocks = None;
        self.has_diagrams = None;
    }
}

// ============================================================================
// Result envelope
// ============================================================================

/// Output of one extraction run.
///
/// A non-empty `errors` list means the run was aborted part-way and
/// `metadata` may be incomplete. `warnings` never block output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataExtractionResult {
    pub metadata: DocumentMetadata,
    pub sources: MetadataCollection,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl MetadataExtractionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
