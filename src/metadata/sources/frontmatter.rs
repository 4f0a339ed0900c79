use tracing::debug;

use super::SourceStage;
use crate::metadata::context::{FrontmatterValue, MetadataExtractionContext};
use crate::metadata::dates::parse_date;
use crate::metadata::fields::{classify, ExtendedField, FieldKey};
use crate::model::{
    MetadataCollection, MetadataEntry, MetadataSource, MetadataValue, PRIORITY_FRONTMATTER,
};

/// Explicit author metadata from the document's frontmatter.
///
/// Mapped keys are translated through `frontmatterMapping` first. Any
/// unmapped key that is itself a canonical field name is then accepted as is.
///
/// Both passes walk keys in sorted order and the first value offered for a
/// field keeps it, so when several keys land on one field the alphabetically
/// first wins: `description` beats `subject`.
pub struct FrontmatterSource;

/// Converts a raw frontmatter value into the shape the target field stores.
///
/// Returns `None` when the value cannot be represented; the field is then
/// simply left out.
fn coerce(field: FieldKey, value: &FrontmatterValue) -> Option<MetadataValue> {
    if field == FieldKey::Extended(ExtendedField::Custom) {
        return match value {
            FrontmatterValue::Map(map) => Some(MetadataValue::Map(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            )),
            _ => None,
        };
    }

    if field.is_date() {
        return match value {
            FrontmatterValue::Date(date) => Some(MetadataValue::Date(*date)),
            FrontmatterValue::String(text) => parse_date(text).map(MetadataValue::Date),
            _ => None,
        };
    }

    match value {
        FrontmatterValue::List(items) if field.is_list_like() => {
            let joined = items
                .iter()
                .filter_map(FrontmatterValue::as_scalar_text)
                .collect::<Vec<_>>()
                .join(", ");
            Some(MetadataValue::Text(joined))
        }
        other => other.as_scalar_text().map(MetadataValue::Text),
    }
}

fn offer(
    sources: &mut MetadataCollection,
    key: &str,
    field: FieldKey,
    value: &FrontmatterValue,
) -> bool {
    match coerce(field, value) {
        Some(value) => sources.offer(
            field,
            MetadataEntry::new(value, MetadataSource::Frontmatter, PRIORITY_FRONTMATTER),
        ),
        None => {
            debug!(key, field = %field, "Frontmatter value could not be coerced; omitted");
            false
        }
    }
}

impl SourceStage for FrontmatterSource {
    fn stage_name(&self) -> &'static str {
        "frontmatter"
    }

    fn is_enabled(&self, context: &MetadataExtractionContext) -> bool {
        context.config.auto_extraction.from_frontmatter && context.frontmatter.is_some()
    }

    fn extract(
        &self,
        context: &MetadataExtractionContext,
        sources: &mut MetadataCollection,
    ) -> usize {
        let Some(frontmatter) = context.frontmatter.as_ref() else {
            return 0;
        };
        let mapping = &context.config.frontmatter_mapping;
        let mut accepted = 0;

        for (key, target) in mapping {
            let Some(value) = frontmatter.get(key) else {
                continue;
            };
            let Some(field) = classify(target) else {
                debug!(key, target = %target, "Mapping target is not a known field; dropped");
                continue;
            };
            if offer(sources, key, field, value) {
                accepted += 1;
            }
        }

        for (key, value) in frontmatter {
            if mapping.contains_key(key) {
                continue;
            }
            match classify(key) {
                Some(field) => {
                    if offer(sources, key, field, value) {
                        accepted += 1;
                    }
                }
                None => debug!(key, "Unrecognised frontmatter key; dropped"),
            }
        }

        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::config::MetadataConfig;
    use crate::metadata::context::Frontmatter;
    use crate::metadata::fields::StandardField;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn run(config: MetadataConfig, frontmatter: Frontmatter) -> MetadataCollection {
        let context = MetadataExtractionContext::new("", config).with_frontmatter(frontmatter);
        let mut sources = MetadataCollection::new();
        FrontmatterSource.extract(&context, &mut sources);
        sources
    }

    fn text(sources: &MetadataCollection, field: FieldKey) -> Option<String> {
        sources.get(field).and_then(|entry| entry.value().as_text())
    }

    #[test]
    fn test_mapped_keys_are_translated() {
        let frontmatter = Frontmatter::from([
            ("description".to_string(), FrontmatterValue::from("About things")),
            (
                "tags".to_string(),
                FrontmatterValue::List(vec!["rust".into(), "pdf".into()]),
            ),
        ]);
        let sources = run(MetadataConfig::default(), frontmatter);

        assert_eq!(
            text(&sources, FieldKey::Standard(StandardField::Subject)).as_deref(),
            Some("About things")
        );
        assert_eq!(
            text(&sources, FieldKey::Standard(StandardField::Keywords)).as_deref(),
            Some("rust, pdf")
        );
        let entry = sources
            .get(FieldKey::Standard(StandardField::Subject))
            .unwrap();
        assert_eq!(entry.source(), MetadataSource::Frontmatter);
        assert_eq!(entry.priority(), PRIORITY_FRONTMATTER);
    }

    #[test]
    fn test_unmapped_canonical_key_is_accepted() {
        let mut config = MetadataConfig::default();
        config.frontmatter_mapping.clear();
        let frontmatter = Frontmatter::from([
            ("team".to_string(), FrontmatterValue::from("Platform")),
            ("mood".to_string(), FrontmatterValue::from("sunny")),
        ]);
        let sources = run(config, frontmatter);

        assert_eq!(
            text(&sources, FieldKey::Extended(ExtendedField::Team)).as_deref(),
            Some("Platform")
        );
        assert_eq!(sources.len(), 1);
    }

    #[test]
    fn test_date_fields_are_coerced() {
        let frontmatter = Frontmatter::from([
            ("date".to_string(), FrontmatterValue::from("2024-02-29")),
            ("updated".to_string(), FrontmatterValue::from("sometime")),
        ]);
        let sources = run(MetadataConfig::default(), frontmatter);

        assert_eq!(
            sources
                .get(FieldKey::Standard(StandardField::CreationDate))
                .unwrap()
                .value(),
            &MetadataValue::Date(Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap())
        );
        assert!(sources
            .get(FieldKey::Standard(StandardField::ModDate))
            .is_none());
    }

    #[test]
    fn test_numbers_render_as_text() {
        let frontmatter = Frontmatter::from([("version".to_string(), FrontmatterValue::Number(2.1))]);
        let sources = run(MetadataConfig::default(), frontmatter);
        assert_eq!(
            text(&sources, FieldKey::Extended(ExtendedField::Version)).as_deref(),
            Some("2.1")
        );
    }

    #[test]
    fn test_custom_requires_a_map() {
        let frontmatter = Frontmatter::from([(
            "custom".to_string(),
            FrontmatterValue::Map(BTreeMap::from([(
                "ticket".to_string(),
                FrontmatterValue::from("OPS-12"),
            )])),
        )]);
        let sources = run(MetadataConfig::default(), frontmatter);
        let MetadataValue::Map(map) = sources
            .get(FieldKey::Extended(ExtendedField::Custom))
            .unwrap()
            .value()
        else {
            panic!("expected map");
        };
        assert_eq!(map["ticket"], serde_json::json!("OPS-12"));

        let frontmatter = Frontmatter::from([("custom".to_string(), FrontmatterValue::from("flat"))]);
        let sources = run(MetadataConfig::default(), frontmatter);
        assert!(sources.is_empty());
    }

    #[test]
    fn test_first_mapped_key_wins_on_tie() {
        // "description" sorts before "subject", so it is offered first.
        let frontmatter = Frontmatter::from([
            ("subject".to_string(), FrontmatterValue::from("Second")),
            ("description".to_string(), FrontmatterValue::from("First")),
        ]);
        let sources = run(MetadataConfig::default(), frontmatter);
        assert_eq!(
            text(&sources, FieldKey::Standard(StandardField::Subject)).as_deref(),
            Some("First")
        );
    }
}
