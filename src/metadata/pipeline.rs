//! Extraction pipeline orchestrator.
//!
//! [`MetadataPipeline`] runs the source stages in order, merges the gathered
//! entries and validates the result:
//! 1. **Defaults**: always
//! 2. **Frontmatter, content, filename, statistics**: only when `enabled`,
//!    each behind its own flag
//! 3. **Merge**: highest priority wins per field
//! 4. **Validate**: failed rules become warnings
//!
//! Any failure along the way is caught and recorded in `errors`; the caller
//! always receives a result.

use async_trait::async_trait;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info, instrument};

use crate::metadata::context::MetadataExtractionContext;
use crate::metadata::merge::merge_sources;
use crate::metadata::sources::{default_stages, SourceStage};
use crate::metadata::validate::validation_warnings;
use crate::model::{MetadataCollection, MetadataExtractionResult};
use crate::traits::MetadataExtractor;

// ============================================================================
// Pipeline Errors
// ============================================================================

/// Errors that abort a pipeline run.
///
/// These are never returned to callers; the pipeline records them in
/// [`MetadataExtractionResult::errors`].
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// The extraction context is malformed
    #[error("Invalid extraction context: {0}")]
    InvalidContext(String),

    /// A stage panicked while extracting
    #[error("Stage '{stage}' failed: {message}")]
    StagePanicked { stage: String, message: String },
}

// ============================================================================
// Pipeline Executor
// ============================================================================

/// Orchestrates the metadata source stages for one document at a time.
///
/// The pipeline holds no per-document state, so one instance can serve any
/// number of documents concurrently.
///
/// # Example
///
/// ```
/// use markdown_pdf_metadata::metadata::{MetadataConfig, MetadataExtractionContext, MetadataPipeline};
///
/// let pipeline = MetadataPipeline::new();
/// let context = MetadataExtractionContext::new("# Hello World", MetadataConfig::default());
/// let result = pipeline.extract(&context);
///
/// assert!(result.errors.is_empty());
/// assert_eq!(result.metadata.title.as_deref(), Some("Hello World"));
/// ```
pub struct MetadataPipeline {
    stages: Vec<Box<dyn SourceStage>>,
}

impl Default for MetadataPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataPipeline {
    /// Creates a pipeline with the built-in stages in their fixed order.
    pub fn new() -> Self {
        Self::with_stages(default_stages())
    }

    /// Creates a pipeline running `stages` in the given order.
    pub fn with_stages(stages: Vec<Box<dyn SourceStage>>) -> Self {
        Self { stages }
    }

    /// Runs the full pipeline for one document.
    #[instrument(skip_all, fields(file = ?context.file_path))]
    pub fn extract(&self, context: &MetadataExtractionContext) -> MetadataExtractionResult {
        let mut result = MetadataExtractionResult::new();

        info!("Starting metadata extraction");
        match self.run(context, &mut result) {
            Ok(()) => {
                info!(
                    fields = result.sources.len(),
                    warnings = result.warnings.len(),
                    "Metadata extraction completed"
                );
            }
            Err(e) => {
                // Keep whatever was gathered before the failure.
                result.metadata = merge_sources(&result.sources);
                error!(error = %e, "Metadata extraction failed");
                result.errors.push(format!("Metadata extraction failed: {e}"));
            }
        }

        result
    }

    fn run(
        &self,
        context: &MetadataExtractionContext,
        result: &mut MetadataExtractionResult,
    ) -> Result<(), PipelineError> {
        check_context(context)?;

        for stage in &self.stages {
            if !stage.always_runs() && !context.config.enabled {
                debug!(stage = stage.stage_name(), "Extraction disabled; stage skipped");
                continue;
            }
            if !stage.is_enabled(context) {
                debug!(stage = stage.stage_name(), "Stage gate closed; skipped");
                continue;
            }

            let accepted = run_stage(stage.as_ref(), context, &mut result.sources)?;
            debug!(
                stage = stage.stage_name(),
                accepted,
                total = result.sources.len(),
                "Stage completed"
            );
        }

        result.metadata = merge_sources(&result.sources);
        result.warnings.extend(validation_warnings(
            &result.metadata,
            &context.config.validation,
        ));

        Ok(())
    }
}

fn check_context(context: &MetadataExtractionContext) -> Result<(), PipelineError> {
    if let Some(path) = &context.file_path {
        if path.file_name().is_none() {
            return Err(PipelineError::InvalidContext(format!(
                "file path '{}' has no file name",
                path.display()
            )));
        }
    }
    Ok(())
}

fn run_stage(
    stage: &dyn SourceStage,
    context: &MetadataExtractionContext,
    sources: &mut MetadataCollection,
) -> Result<usize, PipelineError> {
    panic::catch_unwind(AssertUnwindSafe(|| stage.extract(context, sources))).map_err(|payload| {
        PipelineError::StagePanicked {
            stage: stage.stage_name().to_string(),
            message: panic_message(payload.as_ref()),
        }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[async_trait]
impl MetadataExtractor for MetadataPipeline {
    fn extractor_id(&self) -> &str {
        "pipeline"
    }

    async fn extract_metadata(&self, context: &MetadataExtractionContext) -> MetadataExtractionResult {
        self.extract(context)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::config::MetadataConfig;
    use crate::metadata::context::{Frontmatter, FrontmatterValue};
    use crate::metadata::fields::StandardField;
    use crate::metadata::sources::DefaultsSource;
    use crate::model::MetadataSource;
    use chrono::{TimeZone, Utc};

    struct PanickingStage;

    impl SourceStage for PanickingStage {
        fn stage_name(&self) -> &'static str {
            "panicking"
        }

        fn is_enabled(&self, _context: &MetadataExtractionContext) -> bool {
            true
        }

        fn extract(
            &self,
            _context: &MetadataExtractionContext,
            _sources: &mut MetadataCollection,
        ) -> usize {
            panic!("boom")
        }
    }

    fn fixed_context(markdown: &str) -> MetadataExtractionContext {
        MetadataExtractionContext::new(markdown, MetadataConfig::default())
            .with_generate_date(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_frontmatter_beats_heading() {
        let context = fixed_context("# Heading").with_frontmatter(Frontmatter::from([(
            "title".to_string(),
            FrontmatterValue::from("FM"),
        )]));
        let result = MetadataPipeline::new().extract(&context);

        assert_eq!(result.metadata.title.as_deref(), Some("FM"));
        assert_eq!(
            result.sources.standard()[&StandardField::Title].source(),
            MetadataSource::Frontmatter
        );
    }

    #[test]
    fn test_disabled_keeps_only_defaults() {
        let mut config = MetadataConfig::default();
        config.enabled = false;
        let context = MetadataExtractionContext::new("# Heading\n\nSome words", config)
            .with_file_path("guide_v1.2_2024-01-31.md")
            .with_frontmatter(Frontmatter::from([(
                "author".to_string(),
                FrontmatterValue::from("Ada"),
            )]));
        let result = MetadataPipeline::new().extract(&context);

        assert!(result.sources.computed().is_empty());
        assert!(result
            .sources
            .standard()
            .values()
            .chain(result.sources.extended().values())
            .all(|entry| entry.source() == MetadataSource::Default));
        assert_eq!(result.metadata.title, None);
        assert_eq!(result.metadata.author, None);
        assert_eq!(result.metadata.version, None);
        assert_eq!(result.metadata.word_count, None);
        assert_eq!(result.metadata.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_invalid_context_is_reported_not_raised() {
        let context = fixed_context("# Title").with_file_path("/");
        let result = MetadataPipeline::new().extract(&context);

        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("has no file name"));
        assert!(result.sources.is_empty());
    }

    #[test]
    fn test_stage_panic_keeps_partial_result() {
        let pipeline =
            MetadataPipeline::with_stages(vec![Box::new(DefaultsSource), Box::new(PanickingStage)]);
        let result = pipeline.extract(&fixed_context(""));

        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("panicking"));
        assert!(result.errors[0].contains("boom"));
        assert_eq!(
            result.metadata.creation_date,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let context = fixed_context("# Same\n\n![x](y.png)").with_file_path("same_v1.0.md");
        let pipeline = MetadataPipeline::new();
        assert_eq!(pipeline.extract(&context), pipeline.extract(&context));
    }

    #[tokio::test]
    async fn test_async_contract_matches_sync() {
        let context = fixed_context("# Async");
        let pipeline = MetadataPipeline::new();

        let result = pipeline.extract_metadata(&context).await;
        assert_eq!(result, pipeline.extract(&context));
        assert_eq!(pipeline.extractor_id(), "pipeline");
    }
}
