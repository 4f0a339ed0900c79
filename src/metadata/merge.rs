//! Priority merge of the source collection into one resolved record.

use std::collections::HashMap;

use crate::metadata::fields::{ComputedField, ExtendedField, StandardField};
use crate::model::{DocumentMetadata, MetadataCollection, MetadataEntry};

/// Any field from any bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum AnyField {
    Standard(StandardField),
    Extended(ExtendedField),
    Computed(ComputedField),
}

/// Resolves every field to the entry with the greatest priority.
///
/// Buckets are walked standard → extended → computed. A later entry replaces
/// the current winner only when its priority is strictly greater, so the
/// first-seen entry wins ties.
pub fn merge_sources(sources: &MetadataCollection) -> DocumentMetadata {
    let candidates = sources
        .standard()
        .iter()
        .map(|(field, entry)| (AnyField::Standard(*field), entry))
        .chain(
            sources
                .extended()
                .iter()
                .map(|(field, entry)| (AnyField::Extended(*field), entry)),
        )
        .chain(
            sources
                .computed()
                .iter()
                .map(|(field, entry)| (AnyField::Computed(*field), entry)),
        );

    let mut order: Vec<AnyField> = Vec::new();
    let mut winners: HashMap<AnyField, &MetadataEntry> = HashMap::new();
    for (field, entry) in candidates {
        match winners.get(&field) {
            Some(current) if entry.priority() <= current.priority() => {}
            Some(_) => {
                winners.insert(field, entry);
            }
            None => {
                order.push(field);
                winners.insert(field, entry);
            }
        }
    }

    let mut metadata = DocumentMetadata::default();
    for field in order {
        let value = winners[&field].value();
        match field {
            AnyField::Standard(field) => metadata.set_standard(field, value),
            AnyField::Extended(field) => metadata.set_extended(field, value),
            AnyField::Computed(field) => metadata.set_computed(field, value),
        }
    }

    if let Some(keywords) = metadata.keywords.take() {
        metadata.keywords = Some(strip_outer_quotes(&keywords).to_string());
    }

    metadata
}

/// Removes at most one leading and one trailing quote character.
fn strip_outer_quotes(text: &str) -> &str {
    let text = text
        .strip_prefix(['"', '\''])
        .unwrap_or(text);
    text.strip_suffix(['"', '\'']).unwrap_or(text)
}
