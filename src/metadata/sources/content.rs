use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::SourceStage;
use crate::metadata::config::TITLE_PLACEHOLDER;
use crate::metadata::context::MetadataExtractionContext;
use crate::metadata::fields::StandardField;
use crate::metadata::frontmatter::strip_frontmatter;
use crate::model::{
    MetadataCollection, MetadataEntry, MetadataSource, MetadataValue, PRIORITY_DETECTED,
    PRIORITY_INFERRED,
};

static FIRST_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").expect("Invalid heading regex"));

static VERSION_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[._-]v?\d+\.\d+(\.\d+)?").expect("Invalid version suffix regex")
});

static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("Invalid date regex"));

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").expect("Invalid separator regex"));

/// Infers a title when none has been supplied yet.
///
/// The first level-one heading of the body wins; a leading frontmatter block
/// is never scanned. Without one, a title is derived from the
/// file name at a lower priority.
pub struct ContentSource;

/// Builds a display title from a file stem.
///
/// `release-notes_2024-03-01_v1.2` becomes `Release Notes`.
pub fn title_from_filename(stem: &str) -> Option<String> {
    let without_version = VERSION_SUFFIX_RE.replace_all(stem, "");
    let without_date = ISO_DATE_RE.replace_all(&without_version, "");
    let spaced = SEPARATOR_RE.replace_all(&without_date, " ");

    let title = spaced
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ");

    (!title.is_empty()).then_some(title)
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn first_heading(markdown: &str) -> Option<String> {
    FIRST_HEADING_RE
        .captures(markdown)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|heading| !heading.is_empty())
}

fn needs_title(sources: &MetadataCollection) -> bool {
    match sources.standard().get(&StandardField::Title) {
        None => true,
        Some(entry) => matches!(entry.value(), MetadataValue::Text(text) if text == TITLE_PLACEHOLDER),
    }
}

impl SourceStage for ContentSource {
    fn stage_name(&self) -> &'static str {
        "content"
    }

    fn is_enabled(&self, context: &MetadataExtractionContext) -> bool {
        context.config.auto_extraction.from_content
    }

    fn extract(
        &self,
        context: &MetadataExtractionContext,
        sources: &mut MetadataCollection,
    ) -> usize {
        if !needs_title(sources) {
            debug!("Title already present; content inference skipped");
            return 0;
        }

        let (title, priority) = match first_heading(strip_frontmatter(&context.markdown_content)) {
            Some(heading) => (heading, PRIORITY_DETECTED),
            None => match context.document_stem().as_deref().and_then(title_from_filename) {
                Some(title) => (title, PRIORITY_INFERRED),
                None => return 0,
            },
        };

        debug!(title = %title, priority, "Inferred title");
        let entry = MetadataEntry::new(MetadataValue::Text(title), MetadataSource::Auto, priority);
        usize::from(sources.offer_standard(StandardField::Title, entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::config::MetadataConfig;

    fn title_of(context: &MetadataExtractionContext) -> Option<(String, u8)> {
        let mut sources = MetadataCollection::new();
        ContentSource.extract(context, &mut sources);
        sources
            .standard()
            .get(&StandardField::Title)
            .map(|entry| (entry.value().as_text().unwrap_or_default(), entry.priority()))
    }

    #[test]
    fn test_first_heading_becomes_title() {
        let context = MetadataExtractionContext::new(
            "Intro text\n\n# Hello World  \n\n## Section\n\n# Another",
            MetadataConfig::default(),
        );
        assert_eq!(
            title_of(&context),
            Some(("Hello World".to_string(), PRIORITY_DETECTED))
        );
    }

    #[test]
    fn test_subheadings_are_not_titles() {
        let context = MetadataExtractionContext::new("## Only a section", MetadataConfig::default())
            .with_file_path("notes/meeting-notes.md");
        assert_eq!(
            title_of(&context),
            Some(("Meeting Notes".to_string(), PRIORITY_INFERRED))
        );
    }

    #[test]
    fn test_no_heading_and_no_path() {
        let context = MetadataExtractionContext::new("plain text", MetadataConfig::default());
        assert_eq!(title_of(&context), None);
    }

    #[test]
    fn test_existing_title_is_left_alone() {
        let context = MetadataExtractionContext::new("# Heading", MetadataConfig::default());
        let mut sources = MetadataCollection::new();
        sources.offer_standard(
            StandardField::Title,
            MetadataEntry::new(
                MetadataValue::Text("Configured".to_string()),
                MetadataSource::Default,
                1,
            ),
        );
        assert_eq!(ContentSource.extract(&context, &mut sources), 0);
        assert_eq!(
            sources.standard()[&StandardField::Title].value(),
            &MetadataValue::Text("Configured".to_string())
        );
    }

    #[test]
    fn test_frontmatter_comment_is_not_a_heading() {
        let context = MetadataExtractionContext::new(
            "---\n# internal draft, do not ship\nauthor: Ada\n---\nPlain body without heading",
            MetadataConfig::default(),
        )
        .with_file_path("rollout-plan.md");
        assert_eq!(
            title_of(&context),
            Some(("Rollout Plan".to_string(), PRIORITY_INFERRED))
        );
    }

    #[test]
    fn test_heading_replaces_placeholder_title() {
        let context = MetadataExtractionContext::new("# Real Title", MetadataConfig::default());
        let mut sources = MetadataCollection::new();
        sources.offer_standard(
            StandardField::Title,
            MetadataEntry::new(
                MetadataValue::Text(TITLE_PLACEHOLDER.to_string()),
                MetadataSource::Default,
                1,
            ),
        );

        assert_eq!(ContentSource.extract(&context, &mut sources), 1);
        let title = &sources.standard()[&StandardField::Title];
        assert_eq!(title.value(), &MetadataValue::Text("Real Title".to_string()));
        assert_eq!(title.priority(), PRIORITY_DETECTED);
        assert_eq!(title.source(), MetadataSource::Auto);
    }

    #[test]
    fn test_title_from_filename() {
        assert_eq!(
            title_from_filename("release-notes_2024-03-01_v1.2").as_deref(),
            Some("Release Notes")
        );
        assert_eq!(
            title_from_filename("API_GUIDE.v2.0.1").as_deref(),
            Some("Api Guide")
        );
        assert_eq!(title_from_filename("2024-03-01").as_deref(), None);
    }
}
