//! Failure causes for loading a single post

use std::path::PathBuf;
use thiserror::Error;

/// Why a post could not be produced
///
/// Only [`ContentPipeline::try_post_by_slug`](super::ContentPipeline::try_post_by_slug)
/// hands these out. The public lookups log them and report every variant as
/// "not found".
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("Invalid slug: {0:?}")]
    InvalidSlug(String),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid front-matter: {0}")]
    FrontMatter(String),

    #[error("Invalid date '{0}'")]
    InvalidDate(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl ContentError {
    /// Whether this is the ordinary "no such post" case rather than a broken file
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound(_) | ContentError::InvalidSlug(_))
    }
}
