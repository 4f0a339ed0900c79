//! Metadata module - multi-source metadata extraction and merging.
//!
//! This module provides the engine behind document metadata:
//! - **Fields**: fixed vocabularies and the classifier via [`fields::classify`]
//! - **Sources**: ordered extractors implementing [`SourceStage`]
//! - **Merge**: priority resolution via [`merge_sources`]
//! - **Validation**: non-fatal rule checks via [`validate_metadata`]
//! - **Pipeline**: the orchestrator via [`MetadataPipeline`]
//! - **Service**: output transforms via [`MetadataService`]

pub mod config;
pub mod context;
pub mod dates;
pub mod fields;
pub mod frontmatter;
pub mod merge;
pub mod pipeline;
pub mod service;
pub mod sources;
pub mod validate;

// Re-export commonly used types
pub use config::{
    AutoExtractionConfig, ConfigError, MetadataConfig, ValidationConfig, AUTHOR_PLACEHOLDER,
    TITLE_PLACEHOLDER,
};
pub use context::{Frontmatter, FrontmatterValue, MetadataExtractionContext};
pub use fields::{
    classify, is_extended_field, is_standard_field, ComputedField, ExtendedField, FieldKey,
    StandardField,
};
pub use frontmatter::{parse_frontmatter, strip_frontmatter, ParsedFrontmatter};
pub use merge::merge_sources;
pub use pipeline::{MetadataPipeline, PipelineError};
pub use service::{FilterOptions, MetadataService, PdfInfo};
pub use sources::{DocumentStatistics, SourceStage};
pub use validate::{validate_metadata, ValidationOutcome, ValidationRule};
