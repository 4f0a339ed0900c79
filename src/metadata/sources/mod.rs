//! Metadata source extractors.
//!
//! Each source is a [`SourceStage`] that inspects the extraction context and
//! offers entries into the running [`MetadataCollection`]. Stages run in a
//! fixed order because later stages look at what earlier ones produced:
//!
//! 1. [`DefaultsSource`] - configured defaults and generated dates
//! 2. [`FrontmatterSource`] - explicit author metadata
//! 3. [`ContentSource`] - title from the first heading or the filename
//! 4. [`FilenameSource`] - version and date tokens in the filename
//! 5. [`StatisticsSource`] - word count, page estimate and feature flags

mod content;
mod defaults;
mod filename;
mod frontmatter;
mod statistics;

pub use content::{title_from_filename, ContentSource};
pub use defaults::DefaultsSource;
pub use filename::FilenameSource;
pub use frontmatter::FrontmatterSource;
pub use statistics::{DocumentStatistics, StatisticsSource};

use crate::metadata::context::MetadataExtractionContext;
use crate::model::MetadataCollection;

/// One step of the extraction pipeline.
///
/// Implementations must be deterministic for a given context and collection:
/// the same input always offers the same entries in the same order.
pub trait SourceStage: Send + Sync {
    /// Returns a human-readable name for this stage, used in logs and errors.
    fn stage_name(&self) -> &'static str;

    /// Whether the stage ignores the global `enabled` switch.
    ///
    /// Only the defaults stage does; every other stage is skipped when
    /// extraction is disabled.
    fn always_runs(&self) -> bool {
        false
    }

    /// Checks the stage's own configuration gate.
    fn is_enabled(&self, context: &MetadataExtractionContext) -> bool;

    /// Offers entries into `sources` and returns how many were accepted.
    fn extract(&self, context: &MetadataExtractionContext, sources: &mut MetadataCollection)
        -> usize;
}

/// The built-in stages in pipeline order.
pub fn default_stages() -> Vec<Box<dyn SourceStage>> {
    vec![
        Box::new(DefaultsSource),
        Box::new(FrontmatterSource),
        Box::new(ContentSource),
        Box::new(FilenameSource),
        Box::new(StatisticsSource),
    ]
}
