use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::SourceStage;
use crate::metadata::context::MetadataExtractionContext;
use crate::metadata::dates::ymd_to_utc;
use crate::metadata::fields::{ExtendedField, StandardField};
use crate::model::{
    MetadataCollection, MetadataEntry, MetadataSource, MetadataValue, PRIORITY_DETECTED,
    PRIORITY_INFERRED,
};

static VERSION_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[._-]v?(\d+\.\d+(\.\d+)?)").expect("Invalid version token regex")
});

static DATE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4}-\d{2}-\d{2})").expect("Invalid date token regex"));

/// Picks up version and date tokens embedded in the file name.
///
/// A date token outranks the generated default date but never a date the
/// author wrote in frontmatter.
pub struct FilenameSource;

impl SourceStage for FilenameSource {
    fn stage_name(&self) -> &'static str {
        "filename"
    }

    fn is_enabled(&self, context: &MetadataExtractionContext) -> bool {
        context.config.auto_extraction.from_filename && context.file_path.is_some()
    }

    fn extract(
        &self,
        context: &MetadataExtractionContext,
        sources: &mut MetadataCollection,
    ) -> usize {
        let Some(stem) = context.document_stem() else {
            return 0;
        };
        let mut accepted = 0;

        if let Some(version) = VERSION_TOKEN_RE
            .captures(&stem)
            .and_then(|caps| caps.get(1))
        {
            let entry = MetadataEntry::new(
                MetadataValue::Text(version.as_str().to_string()),
                MetadataSource::Auto,
                PRIORITY_INFERRED,
            );
            if sources.offer_extended(ExtendedField::Version, entry) {
                accepted += 1;
            }
        }

        if let Some(token) = DATE_TOKEN_RE.captures(&stem).and_then(|caps| caps.get(1)) {
            match ymd_to_utc(token.as_str()) {
                Some(date) => {
                    let entry = MetadataEntry::new(
                        MetadataValue::Date(date),
                        MetadataSource::Auto,
                        PRIORITY_DETECTED,
                    );
                    if sources.offer_standard(StandardField::CreationDate, entry) {
                        accepted += 1;
                    }
                }
                None => debug!(token = token.as_str(), "Filename date token is not a real date"),
            }
        }

        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::config::MetadataConfig;
    use chrono::{TimeZone, Utc};

    fn run(path: &str, sources: &mut MetadataCollection) -> usize {
        let context = MetadataExtractionContext::new("", MetadataConfig::default()).with_file_path(path);
        FilenameSource.extract(&context, sources)
    }

    #[test]
    fn test_version_token() {
        let mut sources = MetadataCollection::new();
        run("docs/doc_v2.1.md", &mut sources);
        assert_eq!(
            sources.extended()[&ExtendedField::Version].value(),
            &MetadataValue::Text("2.1".to_string())
        );

        let mut sources = MetadataCollection::new();
        run("manual-3.4.5.md", &mut sources);
        assert_eq!(
            sources.extended()[&ExtendedField::Version].value(),
            &MetadataValue::Text("3.4.5".to_string())
        );
    }

    #[test]
    fn test_date_token_outranks_default_date() {
        let mut sources = MetadataCollection::new();
        sources.offer_standard(
            StandardField::CreationDate,
            MetadataEntry::new(
                MetadataValue::Date(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
                MetadataSource::Default,
                1,
            ),
        );
        assert_eq!(run("minutes_2024-06-30.md", &mut sources), 1);
        assert_eq!(
            sources.standard()[&StandardField::CreationDate].value(),
            &MetadataValue::Date(Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_date_token_never_outranks_frontmatter() {
        let authored = Utc.with_ymd_and_hms(2019, 5, 5, 0, 0, 0).unwrap();
        let mut sources = MetadataCollection::new();
        sources.offer_standard(
            StandardField::CreationDate,
            MetadataEntry::new(MetadataValue::Date(authored), MetadataSource::Frontmatter, 3),
        );
        run("minutes_2024-06-30.md", &mut sources);
        assert_eq!(
            sources.standard()[&StandardField::CreationDate].value(),
            &MetadataValue::Date(authored)
        );
    }

    #[test]
    fn test_invalid_date_token_is_omitted() {
        let mut sources = MetadataCollection::new();
        assert_eq!(run("report_2024-13-40.md", &mut sources), 0);
        assert!(sources.is_empty());
    }
}
