//! Field vocabularies and the field classifier.
//!
//! Every metadata key belongs to at most one of three fixed vocabularies:
//! - [`StandardField`]: the eight PDF document-information properties
//! - [`ExtendedField`]: fourteen non-standard document properties
//! - [`ComputedField`]: seven values derived from content analysis
//!
//! Keys supplied by users (defaults, frontmatter) are routed through
//! [`classify`]; anything that is neither standard nor extended is dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Vocabularies
// ============================================================================

/// The eight standard PDF metadata fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StandardField {
    Title,
    Author,
    Subject,
    Keywords,
    Creator,
    Producer,
    CreationDate,
    ModDate,
}

impl StandardField {
    pub const ALL: [StandardField; 8] = [
        StandardField::Title,
        StandardField::Author,
        StandardField::Subject,
        StandardField::Keywords,
        StandardField::Creator,
        StandardField::Producer,
        StandardField::CreationDate,
        StandardField::ModDate,
    ];

    /// Canonical key as it appears in configuration and frontmatter.
    pub fn as_str(&self) -> &'static str {
        match self {
            StandardField::Title => "title",
            StandardField::Author => "author",
            StandardField::Subject => "subject",
            StandardField::Keywords => "keywords",
            StandardField::Creator => "creator",
            StandardField::Producer => "producer",
            StandardField::CreationDate => "creationDate",
            StandardField::ModDate => "modDate",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "title" => Some(StandardField::Title),
            "author" => Some(StandardField::Author),
            "subject" => Some(StandardField::Subject),
            "keywords" => Some(StandardField::Keywords),
            "creator" => Some(StandardField::Creator),
            "producer" => Some(StandardField::Producer),
            "creationDate" => Some(StandardField::CreationDate),
            "modDate" => Some(StandardField::ModDate),
            _ => None,
        }
    }
}

/// The fourteen extended (non-PDF) metadata fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtendedField {
    Organization,
    Department,
    Team,
    Category,
    Version,
    Language,
    Copyright,
    License,
    Confidentiality,
    Email,
    Website,
    Format,
    Generator,
    Custom,
}

impl ExtendedField {
    pub const ALL: [ExtendedField; 14] = [
        ExtendedField::Organization,
        ExtendedField::Department,
        ExtendedField::Team,
        ExtendedField::Category,
        ExtendedField::Version,
        ExtendedField::Language,
        ExtendedField::Copyright,
        ExtendedField::License,
        ExtendedField::Confidentiality,
        ExtendedField::Email,
        ExtendedField::Website,
        ExtendedField::Format,
        ExtendedField::Generator,
        ExtendedField::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtendedField::Organization => "organization",
            ExtendedField::Department => "department",
            ExtendedField::Team => "team",
            ExtendedField::Category => "category",
            ExtendedField::Version => "version",
            ExtendedField::Language => "language",
            ExtendedField::Copyright => "copyright",
            ExtendedField::License => "license",
            ExtendedField::Confidentiality => "confidentiality",
            ExtendedField::Email => "email",
            ExtendedField::Website => "website",
            ExtendedField::Format => "format",
            ExtendedField::Generator => "generator",
            ExtendedField::Custom => "custom",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "organization" => Some(ExtendedField::Organization),
            "department" => Some(ExtendedField::Department),
            "team" => Some(ExtendedField::Team),
            "category" => Some(ExtendedField::Category),
            "version" => Some(ExtendedField::Version),
            "language" => Some(ExtendedField::Language),
            "copyright" => Some(ExtendedField::Copyright),
            "license" => Some(ExtendedField::License),
            "confidentiality" => Some(ExtendedField::Confidentiality),
            "email" => Some(ExtendedField::Email),
            "website" => Some(ExtendedField::Website),
            "format" => Some(ExtendedField::Format),
            "generator" => Some(ExtendedField::Generator),
            "custom" => Some(ExtendedField::Custom),
            _ => None,
        }
    }
}

/// The seven fields computed from document content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComputedField {
    WordCount,
    PageCount,
    TocDepth,
    HasImages,
    HasTables,
    HasCodeBlocks,
    HasDiagrams,
}

impl ComputedField {
    pub const ALL: [ComputedField; 7] = [
        ComputedField::WordCount,
        ComputedField::PageCount,
        ComputedField::TocDepth,
        ComputedField::HasImages,
        ComputedField::HasTables,
        ComputedField::HasCodeBlocks,
        ComputedField::HasDiagrams,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComputedField::WordCount => "wordCount",
            ComputedField::PageCount => "pageCount",
            ComputedField::TocDepth => "tocDepth",
            ComputedField::HasImages => "hasImages",
            ComputedField::HasTables => "hasTables",
            ComputedField::HasCodeBlocks => "hasCodeBlocks",
            ComputedField::HasDiagrams => "hasDiagrams",
        }
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// A user-suppliable field after classification.
///
/// Computed fields are deliberately absent: they can only be produced by the
/// statistics stage, never supplied through defaults or frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Standard(StandardField),
    Extended(ExtendedField),
}

impl FieldKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Standard(field) => field.as_str(),
            FieldKey::Extended(field) => field.as_str(),
        }
    }

    /// Whether values for this field are coerced to dates.
    pub fn is_date(&self) -> bool {
        self.as_str().to_ascii_lowercase().contains("date")
    }

    /// Whether list values are joined into a comma-separated string.
    pub fn is_list_like(&self) -> bool {
        matches!(
            self,
            FieldKey::Standard(StandardField::Keywords) | FieldKey::Standard(StandardField::Author)
        )
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_standard_field(key: &str) -> bool {
    StandardField::from_key(key).is_some()
}

pub fn is_extended_field(key: &str) -> bool {
    ExtendedField::from_key(key).is_some()
}

/// Classifies a key into the standard or extended vocabulary.
///
/// Returns `None` for keys in neither vocabulary; callers drop those keys.
pub fn classify(key: &str) -> Option<FieldKey> {
    StandardField::from_key(key)
        .map(FieldKey::Standard)
        .or_else(|| ExtendedField::from_key(key).map(FieldKey::Extended))
}
