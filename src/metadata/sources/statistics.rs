use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::SourceStage;
use crate::metadata::context::MetadataExtractionContext;
use crate::metadata::fields::ComputedField;
use crate::metadata::frontmatter::strip_frontmatter;
use crate::model::{
    MetadataCollection, MetadataEntry, MetadataSource, MetadataValue, PRIORITY_INFERRED,
};

/// Words per printed page used for the page estimate.
pub const WORDS_PER_PAGE: u64 = 250;

static MARKDOWN_PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[#*_`~>|\[\]()!=-]").expect("Invalid punctuation regex"));

static ATX_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#{1,6})[ \t]+\S").expect("Invalid ATX heading regex"));

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]+\)").expect("Invalid image regex"));

static TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\|.*\|[ \t]*\r?$").expect("Invalid table regex"));

static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(```|~~~)").expect("Invalid code fence regex"));

static DIAGRAM_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*```[ \t]*(mermaid|plantuml)\b").expect("Invalid diagram fence regex")
});

/// Content statistics for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStatistics {
    pub word_count: u64,
    pub page_count: u64,
    pub toc_depth: u64,
    pub has_images: bool,
    pub has_tables: bool,
    pub has_code_blocks: bool,
    pub has_diagrams: bool,
}

impl DocumentStatistics {
    pub fn compute(markdown: &str) -> Self {
        let word_count = MARKDOWN_PUNCTUATION_RE
            .replace_all(markdown, "")
            .split_whitespace()
            .count() as u64;

        let toc_depth = ATX_HEADING_RE
            .captures_iter(markdown)
            .filter_map(|caps| caps.get(1))
            .map(|hashes| hashes.as_str().len() as u64)
            .max()
            .unwrap_or(0);

        Self {
            word_count,
            page_count: word_count.div_ceil(WORDS_PER_PAGE).max(1),
            toc_depth,
            has_images: IMAGE_RE.is_match(markdown),
            has_tables: TABLE_RE.is_match(markdown),
            has_code_blocks: CODE_FENCE_RE.is_match(markdown),
            has_diagrams: DIAGRAM_FENCE_RE.is_match(markdown),
        }
    }

    fn entries(&self) -> [(ComputedField, MetadataValue); 7] {
        [
            (ComputedField::WordCount, MetadataValue::Count(self.word_count)),
            (ComputedField::PageCount, MetadataValue::Count(self.page_count)),
            (ComputedField::TocDepth, MetadataValue::Count(self.toc_depth)),
            (ComputedField::HasImages, MetadataValue::Flag(self.has_images)),
            (ComputedField::HasTables, MetadataValue::Flag(self.has_tables)),
            (ComputedField::HasCodeBlocks, MetadataValue::Flag(self.has_code_blocks)),
            (ComputedField::HasDiagrams, MetadataValue::Flag(self.has_diagrams)),
        ]
    }
}

/// Derives the computed fields from the document body.
pub struct StatisticsSource;

impl SourceStage for StatisticsSource {
    fn stage_name(&self) -> &'static str {
        "statistics"
    }

    fn is_enabled(&self, context: &MetadataExtractionContext) -> bool {
        context.config.auto_extraction.compute_stats
    }

    fn extract(
        &self,
        context: &MetadataExtractionContext,
        sources: &mut MetadataCollection,
    ) -> usize {
        let stats = DocumentStatistics::compute(strip_frontmatter(&context.markdown_content));

        let mut accepted = 0;
        for (field, value) in stats.entries() {
            let entry = MetadataEntry::new(value, MetadataSource::Auto, PRIORITY_INFERRED);
            if sources.offer_computed(field, entry) {
                accepted += 1;
            }
        }
        accepted
    }
}
