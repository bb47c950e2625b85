//! Post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blog post, built fresh from its source file on every read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// File name without the `.md` extension
    pub slug: String,

    /// Post title, the slug when front-matter has none
    pub title: String,

    /// Publication date
    pub date: DateTime<Utc>,

    /// Short summary
    pub excerpt: String,

    /// Post tags, in front-matter order
    pub tags: Vec<String>,

    /// Author name
    pub author: String,

    /// Rendered HTML content
    pub content: String,

    /// Estimated minutes to read
    pub reading_time: usize,
}

impl Post {
    /// Whether the post carries `tag` (exact, case-sensitive)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Minutes needed to read `body` at `words_per_minute`
///
/// Words are whitespace-delimited tokens of the raw markdown.
pub fn reading_time(body: &str, words_per_minute: usize) -> usize {
    let words = body.split_whitespace().count();
    words.div_ceil(words_per_minute.max(1))
}
