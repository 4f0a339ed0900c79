//! YAML frontmatter extraction.
//!
//! Recognises a `---` delimited block at the very start of a document:
//!
//! ```markdown
//! ---
//! title: Quarterly Report
//! tags: [finance, q3]
//! authors:
//!   - Ada
//!   - Grace
//! date: 2024-09-30
//! custom:
//!   ticket: OPS-12
//! ---
//!
//! # Body
//! ```
//!
//! The block is parsed with `serde_yaml`. Strings that read as dates are
//! lifted to [`FrontmatterValue::Date`] afterwards, since YAML itself keeps
//! them as plain strings.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::metadata::context::{Frontmatter, FrontmatterValue};
use crate::metadata::dates::parse_date;

static DATE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("Invalid date prefix regex"));

/// Frontmatter data plus the document body that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFrontmatter<'a> {
    pub data: Frontmatter,
    pub body: &'a str,
}

/// Parses a leading frontmatter block.
///
/// Returns `None` when the document does not open with `---` or the block is
/// never closed. A closed block that is not valid YAML, or whose top level is
/// not a mapping, yields empty data with the body still split off.
pub fn parse_frontmatter(content: &str) -> Option<ParsedFrontmatter<'_>> {
    let mut lines = content.split_inclusive('\n');
    let opening = lines.next()?;
    if opening.trim_end() != "---" {
        return None;
    }

    let mut offset = opening.len();
    let mut block = String::new();
    let mut closed = false;
    for line in lines {
        offset += line.len();
        if line.trim_end() == "---" {
            closed = true;
            break;
        }
        block.push_str(line);
    }

    if !closed {
        debug!("Frontmatter opening delimiter found but no closing delimiter");
        return None;
    }

    let data = parse_block(&block);
    debug!(keys = data.len(), "Parsed frontmatter block");

    Some(ParsedFrontmatter {
        data,
        body: &content[offset..],
    })
}

/// Returns the document body with any leading frontmatter removed.
pub fn strip_frontmatter(content: &str) -> &str {
    parse_frontmatter(content)
        .map(|parsed| parsed.body)
        .unwrap_or(content)
}

fn parse_block(block: &str) -> Frontmatter {
    let value = match serde_yaml::from_str::<serde_yaml::Value>(block) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to parse frontmatter YAML: {e}");
            return Frontmatter::new();
        }
    };

    match lift_dates(FrontmatterValue::from(value)) {
        FrontmatterValue::Map(data) => data,
        FrontmatterValue::Null => Frontmatter::new(),
        _ => {
            warn!("Frontmatter YAML is not a mapping; ignoring it");
            Frontmatter::new()
        }
    }
}

fn lift_dates(value: FrontmatterValue) -> FrontmatterValue {
    match value {
        FrontmatterValue::String(text) if DATE_PREFIX_RE.is_match(&text) => parse_date(&text)
            .map(FrontmatterValue::Date)
            .unwrap_or(FrontmatterValue::String(text)),
        FrontmatterValue::List(items) => {
            FrontmatterValue::List(items.into_iter().map(lift_dates).collect())
        }
        FrontmatterValue::Map(map) => FrontmatterValue::Map(
            map.into_iter()
                .map(|(key, value)| (key, lift_dates(value)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_parse_scalars() {
        let content = "---\ntitle: \"Quarterly: Q3\"\ndraft: false\nversion: 2.1\ndate: 2024-09-30\nnote: plain text\n---\n# Body\n";
        let parsed = parse_frontmatter(content).unwrap();

        assert_eq!(
            parsed.data["title"],
            FrontmatterValue::String("Quarterly: Q3".to_string())
        );
        assert_eq!(parsed.data["draft"], FrontmatterValue::Bool(false));
        assert_eq!(parsed.data["version"], FrontmatterValue::Number(2.1));
        assert_eq!(
            parsed.data["date"],
            FrontmatterValue::Date(Utc.with_ymd_and_hms(2024, 9, 30, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parsed.data["note"],
            FrontmatterValue::String("plain text".to_string())
        );
        assert_eq!(parsed.body, "# Body\n");
    }

    #[test]
    fn test_parse_lists() {
        let content = "---\ntags: [rust, 'pdf']\nauthors:\n  - Ada\n  - Grace\nempty:\n---\n";
        let parsed = parse_frontmatter(content).unwrap();

        assert_eq!(
            parsed.data["tags"],
            FrontmatterValue::List(vec!["rust".into(), "pdf".into()])
        );
        assert_eq!(
            parsed.data["authors"],
            FrontmatterValue::List(vec!["Ada".into(), "Grace".into()])
        );
        assert_eq!(parsed.data["empty"], FrontmatterValue::Null);
        assert_eq!(parsed.body, "");
    }

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let content = "---\n# a comment\n\ntitle: Doc\n---\nBody";
        let parsed = parse_frontmatter(content).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.body, "Body");
    }

    #[test]
    fn test_nested_mapping_is_kept() {
        let content = "---\ntitle: Plan\ncustom:\n  ticket: OPS-12\n  owner: ada\n---\n";
        let parsed = parse_frontmatter(content).unwrap();

        assert_eq!(parsed.data.len(), 2);
        assert_eq!(
            parsed.data["custom"],
            FrontmatterValue::Map(
                [
                    ("owner".to_string(), FrontmatterValue::from("ada")),
                    ("ticket".to_string(), FrontmatterValue::from("OPS-12")),
                ]
                .into_iter()
                .collect()
            )
        );
    }

    #[test]
    fn test_invalid_yaml_keeps_body() {
        let content = "---\ntitle: [unclosed\n---\nBody";
        let parsed = parse_frontmatter(content).unwrap();
        assert!(parsed.data.is_empty());
        assert_eq!(parsed.body, "Body");
    }

    #[test]
    fn test_empty_block() {
        let parsed = parse_frontmatter("---\n---\nBody").unwrap();
        assert!(parsed.data.is_empty());
        assert_eq!(parsed.body, "Body");
    }

    #[test]
    fn test_no_frontmatter() {
        assert!(parse_frontmatter("# Just markdown").is_none());
        assert!(parse_frontmatter("").is_none());
        assert_eq!(strip_frontmatter("# Just markdown"), "# Just markdown");
    }

    #[test]
    fn test_unclosed_frontmatter() {
        let content = "---\ntitle: Incomplete\n\nNo closing delimiter";
        assert!(parse_frontmatter(content).is_none());
        assert_eq!(strip_frontmatter(content), content);
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody";
        let parsed = parse_frontmatter(content).unwrap();
        assert_eq!(parsed.data["title"], FrontmatterValue::String("Windows".to_string()));
        assert_eq!(parsed.body, "Body");
    }
}
