//! Content pipeline - loads posts from the content directory

use anyhow::Result;
use chrono::Utc;
use chrono_tz::Tz;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use walkdir::WalkDir;

use super::post::reading_time;
use super::{ContentError, FrontMatter, MarkdownRenderer, Post};
use crate::config::SiteConfig;

const MARKDOWN_EXTENSION: &str = ".md";

/// Reads posts from a directory of markdown files
///
/// Holds no state between calls besides the syntax and theme sets, so every
/// lookup reflects what is on disk right now. Cloning is cheap.
#[derive(Clone)]
pub struct ContentPipeline {
    content_dir: PathBuf,
    renderer: Arc<MarkdownRenderer>,
    timezone: Tz,
    words_per_minute: usize,
    strict_dates: bool,
}

impl ContentPipeline {
    /// Create a pipeline with default settings for `content_dir`
    pub fn new<P: AsRef<Path>>(content_dir: P) -> Self {
        let defaults = SiteConfig::default();
        Self {
            content_dir: content_dir.as_ref().to_path_buf(),
            renderer: Arc::new(MarkdownRenderer::new()),
            timezone: chrono_tz::UTC,
            words_per_minute: defaults.words_per_minute,
            strict_dates: defaults.strict_dates,
        }
    }

    /// Create a pipeline from site configuration, resolving the content directory against `base_dir`
    pub fn from_config<P: AsRef<Path>>(base_dir: P, config: &SiteConfig) -> Result<Self> {
        let renderer = MarkdownRenderer::with_themes(
            &config.highlight.light_theme,
            &config.highlight.dark_theme,
        )?;
        Ok(Self {
            content_dir: base_dir.as_ref().join(&config.content_dir),
            renderer: Arc::new(renderer),
            timezone: config.tz()?,
            words_per_minute: config.words_per_minute.max(1),
            strict_dates: config.strict_dates,
        })
    }

    /// Directory posts are read from
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// List the slugs of all markdown files in the content directory
    ///
    /// A missing directory means no content yet and yields an empty list.
    /// Order follows the filesystem and carries no meaning.
    pub fn all_slugs(&self) -> Vec<String> {
        if !self.content_dir.is_dir() {
            return Vec::new();
        }

        WalkDir::new(&self.content_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", self.content_dir, e);
                    None
                }
            })
            .filter(|entry| !entry.file_type().is_dir())
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?;
                let slug = name.strip_suffix(MARKDOWN_EXTENSION)?;
                (!slug.is_empty()).then(|| slug.to_string())
            })
            .collect()
    }

    /// Fetch a single post, or `None` when it does not exist or cannot be processed
    ///
    /// Failures are logged here and never reach the caller, so one broken file
    /// looks exactly like a missing one.
    pub fn post_by_slug(&self, slug: &str) -> Option<Post> {
        match self.try_post_by_slug(slug) {
            Ok(post) => Some(post),
            Err(e) if e.is_not_found() => {
                tracing::debug!("{}", e);
                None
            }
            Err(e) => {
                tracing::warn!("Error processing post {}: {}", slug, e);
                None
            }
        }
    }

    /// Fetch a single post, keeping the reason for any failure
    pub fn try_post_by_slug(&self, slug: &str) -> Result<Post, ContentError> {
        let path = self.resolve(slug)?;
        let content = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ContentError::NotFound(slug.to_string())
            } else {
                ContentError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let (fm, body) = FrontMatter::parse(&content)?;
        let date = match fm.parse_date(self.timezone)? {
            Some(date) => date,
            None if self.strict_dates => {
                return Err(ContentError::FrontMatter("missing `date`".to_string()))
            }
            None => Utc::now(),
        };
        let content_html = self.renderer.render(body)?;

        Ok(Post {
            slug: slug.to_string(),
            title: fm
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| slug.to_string()),
            date,
            excerpt: fm.excerpt.unwrap_or_default(),
            tags: fm.tags,
            author: fm.author.unwrap_or_default(),
            content: content_html,
            reading_time: reading_time(body, self.words_per_minute),
        })
    }

    /// Fetch every post, newest first
    ///
    /// Each file is loaded on its own blocking task; posts that fail to load
    /// are left out.
    pub async fn all_posts(&self) -> Vec<Post> {
        let mut tasks = JoinSet::new();
        for slug in self.all_slugs() {
            let pipeline = self.clone();
            tasks.spawn_blocking(move || pipeline.post_by_slug(&slug));
        }

        let mut posts = Vec::new();
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(Some(post)) => posts.push(post),
                Ok(None) => {}
                Err(e) => tracing::error!("Post loading task failed: {}", e),
            }
        }

        sort_newest_first(&mut posts);
        posts
    }

    /// Fetch every post on the current thread, newest first
    pub fn all_posts_sequential(&self) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .all_slugs()
            .iter()
            .filter_map(|slug| self.post_by_slug(slug))
            .collect();
        sort_newest_first(&mut posts);
        posts
    }

    /// Fetch the posts tagged with `tag` (exact match), newest first
    pub async fn posts_by_tag(&self, tag: &str) -> Vec<Post> {
        let mut posts = self.all_posts().await;
        posts.retain(|post| post.has_tag(tag));
        posts
    }

    /// Count posts per tag, most used first
    pub async fn tag_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for post in self.all_posts().await {
            for tag in post.tags {
                *counts.entry(tag).or_insert(0) += 1;
            }
        }
        let mut counts: Vec<_> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }

    /// Map a slug to its source file, refusing anything that could leave the content directory
    fn resolve(&self, slug: &str) -> Result<PathBuf, ContentError> {
        // One path component with `.md` appended is always a plain file name,
        // so `.` and `..` become `..md` and `...md` rather than directories
        let is_valid = !slug.is_empty() && !slug.contains(['/', '\\', '\0']);
        if !is_valid {
            return Err(ContentError::InvalidSlug(slug.to_string()));
        }

        let path = self
            .content_dir
            .join(format!("{}{}", slug, MARKDOWN_EXTENSION));
        if !path.is_file() {
            return Err(ContentError::NotFound(slug.to_string()));
        }
        Ok(path)
    }
}

fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}
