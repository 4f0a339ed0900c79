//! Output transforms over resolved metadata.
//!
//! [`MetadataService`] turns a [`DocumentMetadata`] into the shapes the
//! rendering collaborators consume: a PDF information dictionary, HTML head
//! tags and a one-line summary. It also offers record-level helpers for
//! merging and filtering. Every function is total and stateless.

use serde::{Deserialize, Serialize};

use crate::model::{to_iso_string, DocumentMetadata};

/// Language used when a document does not declare one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// PDF document information dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PdfInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mod_date: Option<String>,
}

/// Which parts of a record [`MetadataService::filter_metadata`] keeps.
///
/// Everything is kept by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterOptions {
    pub require_title: bool,
    pub require_author: bool,
    pub include_extended: bool,
    pub include_computed: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            require_title: true,
            require_author: true,
            include_extended: true,
            include_computed: true,
        }
    }
}

pub struct MetadataService;

impl MetadataService {
    pub fn to_pdf_info(metadata: &DocumentMetadata) -> PdfInfo {
        PdfInfo {
            title: metadata.title.clone(),
            author: metadata.author.clone(),
            subject: metadata.subject.clone(),
            keywords: metadata.keywords.clone(),
            creator: metadata.creator.clone(),
            producer: metadata.producer.clone(),
            creation_date: metadata.creation_date.as_ref().map(to_iso_string),
            mod_date: metadata.mod_date.as_ref().map(to_iso_string),
        }
    }

    /// Renders `<title>`, named `<meta>` tags and their Dublin Core
    /// equivalents, one tag per line. Every value is HTML-escaped.
    pub fn to_html_meta_tags(metadata: &DocumentMetadata) -> String {
        let mut tags = Vec::new();

        if let Some(title) = &metadata.title {
            tags.push(format!("<title>{}</title>", escape_html(title)));
        }

        let named = [
            ("author", &metadata.author),
            ("subject", &metadata.subject),
            ("keywords", &metadata.keywords),
            ("language", &metadata.language),
            ("organization", &metadata.organization),
            ("copyright", &metadata.copyright),
            ("version", &metadata.version),
        ];
        let dublin_core = [
            ("DC.title", &metadata.title),
            ("DC.creator", &metadata.author),
            ("DC.description", &metadata.subject),
            ("DC.language", &metadata.language),
        ];

        for (name, value) in named.into_iter().chain(dublin_core) {
            if let Some(value) = value {
                tags.push(format!(
                    "<meta name=\"{}\" content=\"{}\">",
                    name,
                    escape_html(value)
                ));
            }
        }

        tags.join("\n")
    }

    /// One comma-separated line describing the document.
    pub fn generate_summary(metadata: &DocumentMetadata) -> String {
        let mut parts = Vec::new();

        if let Some(title) = &metadata.title {
            parts.push(format!("Title: {title}"));
        }
        if let Some(author) = &metadata.author {
            parts.push(format!("Author: {author}"));
        }
        if let Some(organization) = &metadata.organization {
            parts.push(format!("Organization: {organization}"));
        }
        if let Some(version) = &metadata.version {
            parts.push(format!("Version: {version}"));
        }
        if let Some(words) = metadata.word_count {
            parts.push(format!("Words: {words}"));
        }
        if let Some(pages) = metadata.page_count {
            parts.push(format!("Pages: {pages}"));
        }

        let features = [
            (metadata.has_images, "images"),
            (metadata.has_tables, "tables"),
            (metadata.has_code_blocks, "code blocks"),
            (metadata.has_diagrams, "diagrams"),
        ];
        for (flag, label) in features {
            if flag == Some(true) {
                parts.push(format!("Contains {label}"));
            }
        }

        parts.join(", ")
    }

    /// Shallow merge where every populated field of `overrides` wins.
    ///
    /// The `custom` map is merged key by key the same way.
    pub fn merge_metadata(base: &DocumentMetadata, overrides: &DocumentMetadata) -> DocumentMetadata {
        fn pick<T: Clone>(base: &Option<T>, overrides: &Option<T>) -> Option<T> {
            overrides.clone().or_else(|| base.clone())
        }

        let custom = match (&base.custom, &overrides.custom) {
            (Some(base), Some(overrides)) => {
                let mut merged = base.clone();
                merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
                Some(merged)
            }
            (base, overrides) => pick(base, overrides),
        };

        DocumentMetadata {
            title: pick(&base.title, &overrides.title),
            author: pick(&base.author, &overrides.author),
            subject: pick(&base.subject, &overrides.subject),
            keywords: pick(&base.keywords, &overrides.keywords),
            creator: pick(&base.creator, &overrides.creator),
            producer: pick(&base.producer, &overrides.producer),
            creation_date: pick(&base.creation_date, &overrides.creation_date),
            mod_date: pick(&base.mod_date, &overrides.mod_date),
            organization: pick(&base.organization, &overrides.organization),
            department: pick(&base.department, &overrides.department),
            team: pick(&base.team, &overrides.team),
            category: pick(&base.category, &overrides.category),
            version: pick(&base.version, &overrides.version),
            language: pick(&base.language, &overrides.language),
            copyright: pick(&base.copyright, &overrides.copyright),
            license: pick(&base.license, &overrides.license),
            confidentiality: pick(&base.confidentiality, &overrides.confidentiality),
            email: pick(&base.email, &overrides.email),
            website: pick(&base.website, &overrides.website),
            format: pick(&base.format, &overrides.format),
            generator: pick(&base.generator, &overrides.generator),
            custom,
            word_count: pick(&base.word_count, &overrides.word_count),
            page_count: pick(&base.page_count, &overrides.page_count),
            toc_depth: pick(&base.toc_depth, &overrides.toc_depth),
            has_images: pick(&base.has_images, &overrides.has_images),
            has_tables: pick(&base.has_tables, &overrides.has_tables),
            has_code_blocks: pick(&base.has_code_blocks, &overrides.has_code_blocks),
            has_diagrams: pick(&base.has_diagrams, &overrides.has_diagrams),
        }
    }

    pub fn filter_metadata(metadata: &DocumentMetadata, options: &FilterOptions) -> DocumentMetadata {
        let mut filtered = metadata.clone();
        if !options.require_title {
            filtered.title = None;
        }
        if !options.require_author {
            filtered.author = None;
        }
        if !options.include_extended {
            filtered.clear_extended();
        }
        if !options.include_computed {
            filtered.clear_computed();
        }
        filtered
    }

    /// The document's language, else `fallback`, else `"en"`.
    pub fn get_document_language(metadata: Option<&DocumentMetadata>, fallback: Option<&str>) -> String {
        metadata
            .and_then(|metadata| metadata.language.clone())
            .unwrap_or_else(|| fallback.unwrap_or(DEFAULT_LANGUAGE).to_string())
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn sample() -> DocumentMetadata {
        DocumentMetadata {
            title: Some("Report".to_string()),
            author: Some("Ada".to_string()),
            subject: Some("Numbers".to_string()),
            keywords: Some("a, b".to_string()),
            creator: Some("Tool".to_string()),
            producer: Some("Engine".to_string()),
            creation_date: Some(Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap()),
            organization: Some("Acme".to_string()),
            version: Some("1.2".to_string()),
            language: Some("de".to_string()),
            word_count: Some(120),
            page_count: Some(1),
            has_tables: Some(true),
            has_images: Some(false),
            ..Default::default()
        }
    }

    #[test]
    fn test_pdf_info_round_trip() {
        let metadata = sample();
        let info = MetadataService::to_pdf_info(&metadata);
        assert_eq!(info.title, metadata.title);
        assert_eq!(info.author, metadata.author);
        assert_eq!(info.subject, metadata.subject);
        assert_eq!(info.keywords, metadata.keywords);
        assert_eq!(info.creator, metadata.creator);
        assert_eq!(info.producer, metadata.producer);
        assert_eq!(info.creation_date.as_deref(), Some("2024-04-01T09:00:00.000Z"));
        assert_eq!(info.mod_date, None);

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["Title"], "Report");
        assert_eq!(json["CreationDate"], "2024-04-01T09:00:00.000Z");
        assert!(json.get("ModDate").is_none());
    }

    #[test]
    fn test_html_meta_tags_escape_values() {
        let metadata = DocumentMetadata {
            title: Some("A & B <x>".to_string()),
            author: Some("O'Neil \"Q\"".to_string()),
            ..Default::default()
        };
        let html = MetadataService::to_html_meta_tags(&metadata);

        assert!(html.contains("<title>A &amp; B &lt;x&gt;</title>"));
        assert!(!html.contains("<x>"));
        assert!(html.contains("<meta name=\"author\" content=\"O&#39;Neil &quot;Q&quot;\">"));
        assert!(html.contains("<meta name=\"DC.title\" content=\"A &amp; B &lt;x&gt;\">"));
        assert!(html.contains("<meta name=\"DC.creator\""));
        assert!(!html.contains("DC.language"));
    }

    #[test]
    fn test_html_meta_tags_empty_record() {
        assert_eq!(MetadataService::to_html_meta_tags(&DocumentMetadata::default()), "");
    }

    #[test]
    fn test_generate_summary() {
        assert_eq!(
            MetadataService::generate_summary(&sample()),
            "Title: Report, Author: Ada, Organization: Acme, Version: 1.2, Words: 120, Pages: 1, Contains tables"
        );
        assert_eq!(MetadataService::generate_summary(&DocumentMetadata::default()), "");
    }

    #[test]
    fn test_merge_metadata() {
        let base = DocumentMetadata {
            title: Some("Base".to_string()),
            author: Some("Ada".to_string()),
            custom: Some(BTreeMap::from([
                ("a".to_string(), serde_json::json!(1)),
                ("b".to_string(), serde_json::json!(2)),
            ])),
            ..Default::default()
        };
        let overrides = DocumentMetadata {
            title: Some("Override".to_string()),
            custom: Some(BTreeMap::from([("b".to_string(), serde_json::json!(3))])),
            ..Default::default()
        };
        let merged = MetadataService::merge_metadata(&base, &overrides);

        assert_eq!(merged.title.as_deref(), Some("Override"));
        assert_eq!(merged.author.as_deref(), Some("Ada"));
        let custom = merged.custom.unwrap();
        assert_eq!(custom["a"], serde_json::json!(1));
        assert_eq!(custom["b"], serde_json::json!(3));
    }

    #[test]
    fn test_filter_metadata() {
        let metadata = sample();
        assert_eq!(
            MetadataService::filter_metadata(&metadata, &FilterOptions::default()),
            metadata
        );

        let filtered = MetadataService::filter_metadata(
            &metadata,
            &FilterOptions {
                require_author: false,
                include_extended: false,
                include_computed: false,
                ..Default::default()
            },
        );
        assert_eq!(filtered.title.as_deref(), Some("Report"));
        assert_eq!(filtered.author, None);
        assert_eq!(filtered.organization, None);
        assert_eq!(filtered.language, None);
        assert_eq!(filtered.word_count, None);
        assert_eq!(filtered.subject.as_deref(), Some("Numbers"));
    }

    #[test]
    fn test_document_language() {
        assert_eq!(MetadataService::get_document_language(Some(&sample()), None), "de");
        assert_eq!(MetadataService::get_document_language(None, None), "en");
        assert_eq!(
            MetadataService::get_document_language(Some(&DocumentMetadata::default()), Some("fr")),
            "fr"
        );
    }
}
