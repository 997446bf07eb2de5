//! Site configuration (site.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Site configuration, loaded from `site.yml` at the base directory.
/// Every field has a default so a bare directory works out of the box.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    /// Absolute base URL used in feed links (no trailing slash needed)
    pub url: String,

    // Content
    /// Directory holding post sources, relative to the base directory
    pub content_dir: String,
    /// Inclusion glob matched against paths relative to `content_dir`
    pub include: String,
    /// Serve drafts on list and detail pages for local preview.
    /// Feeds never include drafts, regardless of this flag.
    pub render_drafts: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Notes".to_string(),
            description: "Notes on code and side projects".to_string(),
            author: "John Doe".to_string(),
            language: "en-us".to_string(),
            url: "https://example.com".to_string(),
            content_dir: "content/posts".to_string(),
            include: "**/*.mdx".to_string(),
            render_drafts: false,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path:?}"))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {path:?}"))?;
        Ok(config)
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}
