//! The compiled post model

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::path::PathBuf;

/// Stable identity of a post within the collection
#[derive(Debug, Clone, Serialize)]
pub struct PostMeta {
    /// Public slug: the source path relative to the content root, without
    /// extension, `/`-separated. Used verbatim in `/n/<path>` URLs.
    pub path: String,
    /// Source file the post was loaded from
    pub source: PathBuf,
}

/// A fully compiled post. Built once during a load pass; immutable after.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub meta: PostMeta,

    /// Post title
    pub title: String,

    /// Publication date; used for ordering and display only
    pub date: DateTime<FixedOffset>,

    /// Optional one-line description (feeds, meta tags)
    pub description: Option<String>,

    /// Drafts are excluded from all public listings and feeds
    pub draft: bool,

    /// Optional ordered tags
    pub tags: Vec<String>,

    /// Untransformed body text
    pub raw: String,

    /// Compiled HTML body, safe to re-render on every request
    pub content: String,
}

impl Post {
    /// Site-relative URL path of the post page
    pub fn url_path(&self) -> String {
        format!("/n/{}", self.meta.path)
    }
}
