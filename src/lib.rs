//! nota: a lightweight MDX blog engine
//!
//! Loads a content collection from disk, validates front matter, compiles
//! markdown bodies once, and serves list pages, post pages, an RSS feed and
//! a sitemap over HTTP. All validation happens at load time; by the time a
//! collection is serving requests every entry in it is well-formed.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod feed;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

use content::{Collection, ContentLoader};

/// Config file name at the base directory
const CONFIG_FILE: &str = "site.yml";

/// The site: configuration plus resolved directories
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content root holding post sources
    pub content_dir: std::path::PathBuf,
}

impl Site {
    /// Create a site from a base directory, reading `site.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
        })
    }

    /// Build a loader for this site's content root and include pattern
    pub fn loader(&self) -> Result<ContentLoader> {
        ContentLoader::new(&self.content_dir, &self.config.include)
    }

    /// Run a full load pass
    pub fn load_collection(&self) -> Result<Collection> {
        Ok(self.loader()?.load()?)
    }
}
