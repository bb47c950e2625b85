//! folio-rs: the content layer of a portfolio and blog site
//!
//! Reads a directory of markdown posts with YAML front-matter, renders them
//! to HTML with light/dark syntax highlighting, and hands back typed post
//! records ordered newest first.

pub mod commands;
pub mod config;
pub mod content;

use anyhow::Result;
use std::path::Path;

/// A site rooted at a directory
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Markdown content directory
    pub content_dir: std::path::PathBuf,
}

impl Folio {
    /// Open a site directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = config::SiteConfig::load_from_dir(&base_dir)?;
        let content_dir = base_dir.join(&config.content_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
        })
    }

    /// Build the content pipeline for this site
    pub fn pipeline(&self) -> Result<content::ContentPipeline> {
        content::ContentPipeline::from_config(&self.base_dir, &self.config)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str) -> Result<std::path::PathBuf> {
        commands::new::create_post(self, title, None)
    }
}
