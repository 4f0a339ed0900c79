use crate::metadata::context::MetadataExtractionContext;
use crate::model::MetadataExtractionResult;
use crate::traits::{ExtractionError, MetadataExtractor};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, instrument};

/// Runs extraction for many documents with bounded concurrency.
pub struct ExtractionExecutor {
    semaphore: Arc<Semaphore>,
}

impl ExtractionExecutor {
    pub fn new(concurrency_limit: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency_limit)),
        }
    }

    #[instrument(skip(self, extractor, context))]
    pub async fn execute<E>(
        &self,
        extractor: Arc<E>,
        context: MetadataExtractionContext,
    ) -> Result<MetadataExtractionResult, ExtractionError>
    where
        E: MetadataExtractor + 'static,
    {
        let _permit = self.semaphore.acquire().await?;

        info!("Starting extraction with: {}", extractor.extractor_id());
        let result = extractor.extract_metadata(&context).await;
        info!(
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "Finished extraction with: {}",
            extractor.extractor_id()
        );

        Ok(result)
    }

    /// Extracts every context concurrently; results keep the input order.
    #[instrument(skip(self, extractor, contexts), fields(documents = contexts.len()))]
    pub async fn execute_batch<E>(
        &self,
        extractor: Arc<E>,
        contexts: Vec<MetadataExtractionContext>,
    ) -> Result<Vec<MetadataExtractionResult>, ExtractionError>
    where
        E: MetadataExtractor + 'static,
    {
        let mut tasks = JoinSet::new();
        for (index, context) in contexts.into_iter().enumerate() {
            let semaphore = Arc::clone(&self.semaphore);
            let extractor = Arc::clone(&extractor);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await?;
                let result = extractor.extract_metadata(&context).await;
                Ok::<_, ExtractionError>((index, result))
            });
        }

        let mut indexed = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            indexed.push(joined??);
        }
        indexed.sort_by_key(|(index, _)| *index);

        info!(documents = indexed.len(), "Batch extraction finished");
        Ok(indexed.into_iter().map(|(_, result)| result).collect())
    }
}
