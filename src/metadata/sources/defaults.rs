use chrono::Utc;
use tracing::debug;

use super::SourceStage;
use crate::metadata::config::{AUTHOR_PLACEHOLDER, TITLE_PLACEHOLDER};
use crate::metadata::context::MetadataExtractionContext;
use crate::metadata::fields::{FieldKey, StandardField};
use crate::model::{
    MetadataCollection, MetadataEntry, MetadataSource, MetadataValue, PRIORITY_DEFAULT,
};

/// Copies configured defaults and stamps the generated dates.
///
/// Placeholder title/author values are skipped so they never hide a title or
/// author inferred later.
pub struct DefaultsSource;

fn is_placeholder(field: FieldKey, value: &MetadataValue) -> bool {
    let MetadataValue::Text(text) = value else {
        return false;
    };
    match field {
        FieldKey::Standard(StandardField::Title) => text == TITLE_PLACEHOLDER,
        FieldKey::Standard(StandardField::Author) => text == AUTHOR_PLACEHOLDER,
        _ => false,
    }
}

impl SourceStage for DefaultsSource {
    fn stage_name(&self) -> &'static str {
        "defaults"
    }

    fn always_runs(&self) -> bool {
        true
    }

    fn is_enabled(&self, _context: &MetadataExtractionContext) -> bool {
        true
    }

    fn extract(
        &self,
        context: &MetadataExtractionContext,
        sources: &mut MetadataCollection,
    ) -> usize {
        let mut accepted = 0;

        for (field, value) in context.config.defaults.supplied_fields() {
            if is_placeholder(field, &value) {
                debug!(field = %field, "Skipping placeholder default");
                continue;
            }
            let entry = MetadataEntry::new(value, MetadataSource::Default, PRIORITY_DEFAULT);
            if sources.offer(field, entry) {
                accepted += 1;
            }
        }

        let generated = context.generate_date.unwrap_or_else(Utc::now);
        for field in [StandardField::CreationDate, StandardField::ModDate] {
            let entry = MetadataEntry::new(
                MetadataValue::Date(generated),
                MetadataSource::Default,
                PRIORITY_DEFAULT,
            );
            if sources.offer_standard(field, entry) {
                accepted += 1;
            }
        }

        accepted
    }
}
