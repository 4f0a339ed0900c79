use crate::metadata::context::MetadataExtractionContext;
use crate::model::MetadataExtractionResult;
use async_trait::async_trait;
use thiserror::Error;

/// Failures at the async boundary around extraction.
///
/// Extraction itself never fails; these only cover scheduling.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Semaphore error: {0}")]
    Semaphore(#[from] tokio::sync::AcquireError),
    #[error("Extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    /// Returns a short identifier for logs (e.g., "pipeline").
    fn extractor_id(&self) -> &str;

    /// Extracts metadata for one document.
    ///
    /// Never fails: problems are reported in the result's `errors` and
    /// `warnings` lists.
    async fn extract_metadata(&self, context: &MetadataExtractionContext) -> MetadataExtractionResult;
}
