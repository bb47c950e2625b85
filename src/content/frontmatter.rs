//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};

use super::ContentError;

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter data from a post
///
/// Only the keys below are recognized; anything else in the block is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub excerpt: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum BlockFormat {
    Yaml,
    Json,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, body)
    pub fn parse(content: &str) -> Result<(Self, &str), ContentError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let (first, rest) = split_line(content);

        let format = match first.trim_end() {
            "---" | "---yaml" => BlockFormat::Yaml,
            "---json" => BlockFormat::Json,
            // No front-matter: the whole file is the body
            _ => return Ok((FrontMatter::default(), content)),
        };

        let mut block_len = 0;
        let mut remaining = rest;
        loop {
            if remaining.is_empty() {
                return Err(ContentError::FrontMatter(
                    "missing closing `---`".to_string(),
                ));
            }
            let (line, next) = split_line(remaining);
            if line.trim_end() == "---" {
                let block = &rest[..block_len];
                let fm = Self::parse_block(block, format)?;
                return Ok((fm, next));
            }
            block_len += remaining.len() - next.len();
            remaining = next;
        }
    }

    fn parse_block(block: &str, format: BlockFormat) -> Result<Self, ContentError> {
        let is_blank = block.lines().all(|line| {
            let trimmed = line.trim();
            trimmed.is_empty() || trimmed.starts_with('#')
        });
        if is_blank {
            return Ok(FrontMatter::default());
        }

        match format {
            BlockFormat::Yaml => serde_yaml::from_str::<FrontMatter>(block)
                .map_err(|e| ContentError::FrontMatter(e.to_string())),
            BlockFormat::Json => serde_json::from_str::<FrontMatter>(block)
                .map_err(|e| ContentError::FrontMatter(e.to_string())),
        }
    }

    /// Parse the date field
    ///
    /// `Ok(None)` when no date was given. Values without an offset are read in `tz`.
    pub fn parse_date(&self, tz: Tz) -> Result<Option<DateTime<Utc>>, ContentError> {
        match self.date.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse_date_string(s, tz)
                .map(Some)
                .ok_or_else(|| ContentError::InvalidDate(s.to_string())),
        }
    }
}

/// Split off the first line, dropping its `\n`
fn split_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(i) => (&s[..i], &s[i + 1..]),
        None => (s, ""),
    }
}

/// Parse a date string in various formats
fn parse_date_string(s: &str, tz: Tz) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let offset_formats = ["%Y-%m-%d %H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return localize(naive, tz);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return localize(d.and_hms_opt(0, 0, 0)?, tz);
        }
    }

    None
}

fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15 10:30:00
excerpt: A first post
author: Jane
tags:
  - rust
  - web
layout: post
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Hello World".to_string()));
        assert_eq!(fm.date, Some("2024-01-15 10:30:00".to_string()));
        assert_eq!(fm.excerpt, Some("A first post".to_string()));
        assert_eq!(fm.author, Some("Jane".to_string()));
        assert_eq!(fm.tags, vec!["rust", "web"]);
        assert_eq!(body, "\nThis is the content.\n");
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = r#"---json
{"title": "Test Post", "tags": ["a", "b"]}
---
This is content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Test Post".to_string()));
        assert_eq!(fm.tags, vec!["a", "b"]);
        assert_eq!(body, "This is content.\n");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just markdown\n\nNo metadata here.\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_frontmatter() {
        let (fm, body) = FrontMatter::parse("---\n---\nBody\n").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "Body\n");

        let (fm, _) = FrontMatter::parse("---\n# only a comment\n---\nBody\n").unwrap();
        assert_eq!(fm, FrontMatter::default());
    }

    #[test]
    fn test_parse_single_string_tags() {
        let content = "---\ntitle: Single Tag Post\ntags: Notes\n---\n\nContent here.\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["Notes"]);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let content = "---\ntitle: T\ncover: hero.png\ndraft: true\n---\nBody";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("T".to_string()));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_unclosed_frontmatter_is_error() {
        let content = "---\ntitle: Never closed\n\nBody text\n";
        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(err, ContentError::FrontMatter(_)));
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let content = "---\ntitle: [unclosed\ntags: {\n---\nBody\n";
        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(err, ContentError::FrontMatter(_)));
    }

    #[test]
    fn test_crlf_fences() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody\r\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Windows".to_string()));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_parse_date_formats() {
        let utc = chrono_tz::UTC;
        let cases = [
            ("2024-01-15", "2024-01-15T00:00:00+00:00"),
            ("2024/01/15", "2024-01-15T00:00:00+00:00"),
            ("2024-01-15 10:30:00", "2024-01-15T10:30:00+00:00"),
            ("2024-01-15T10:30:00", "2024-01-15T10:30:00+00:00"),
            ("2024-01-15T10:30:00.000Z", "2024-01-15T10:30:00+00:00"),
            ("2024-01-15T10:30:00+02:00", "2024-01-15T08:30:00+00:00"),
        ];
        for (input, expected) in cases {
            let fm = FrontMatter {
                date: Some(input.to_string()),
                ..Default::default()
            };
            let dt = fm.parse_date(utc).unwrap().unwrap();
            assert_eq!(dt.to_rfc3339(), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_parse_date_in_timezone() {
        let fm = FrontMatter {
            date: Some("2024-06-01 12:00:00".to_string()),
            ..Default::default()
        };
        let dt = fm.parse_date(chrono_tz::Europe::Berlin).unwrap().unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-06-01T10:00:00+00:00");
    }

    #[test]
    fn test_missing_and_invalid_date() {
        let fm = FrontMatter::default();
        assert!(fm.parse_date(chrono_tz::UTC).unwrap().is_none());

        let fm = FrontMatter {
            date: Some("next tuesday".to_string()),
            ..Default::default()
        };
        let err = fm.parse_date(chrono_tz::UTC).unwrap_err();
        assert!(matches!(err, ContentError::InvalidDate(_)));
    }
}
