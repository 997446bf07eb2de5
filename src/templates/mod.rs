//! HTML page rendering with embedded Tera templates
//!
//! The templates ship inside the binary; there is no theme directory to
//! resolve at runtime.

use anyhow::Result;
use chrono::Datelike;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::Post;

/// Site fields exposed to templates
#[derive(Debug, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
}

impl From<&SiteConfig> for ConfigData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
        }
    }
}

/// A post shaped for template consumption
#[derive(Debug, Serialize)]
pub struct PostView {
    pub title: String,
    /// Display form of the publication date
    pub date: String,
    /// Site-relative URL of the post page
    pub path: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub content: String,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            date: post.date.format("%b %e, %Y").to_string(),
            path: post.url_path(),
            description: post.description.clone(),
            tags: post.tags.clone(),
            content: post.content.clone(),
        }
    }
}

/// Renderer over the embedded template set
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("layout.html", include_str!("builtin/layout.html")),
            ("index.html", include_str!("builtin/index.html")),
            ("post.html", include_str!("builtin/post.html")),
            ("not_found.html", include_str!("builtin/not_found.html")),
        ])?;
        Ok(Self { tera })
    }

    fn base_context(&self, config: &SiteConfig) -> Context {
        let mut context = Context::new();
        context.insert("config", &ConfigData::from(config));
        context.insert("current_year", &chrono::Utc::now().year());
        context
    }

    /// Render the post listing page
    pub fn render_index(&self, config: &SiteConfig, posts: &[PostView]) -> Result<String> {
        let mut context = self.base_context(config);
        context.insert("posts", posts);
        context.insert("page_description", &config.description);
        Ok(self.tera.render("index.html", &context)?)
    }

    /// Render a post detail page
    pub fn render_post(&self, config: &SiteConfig, post: &PostView) -> Result<String> {
        let mut context = self.base_context(config);
        context.insert("post", post);
        if let Some(description) = &post.description {
            context.insert("page_description", description);
        }
        Ok(self.tera.render("post.html", &context)?)
    }

    /// Render the 404 page
    pub fn render_not_found(&self, config: &SiteConfig) -> Result<String> {
        let context = self.base_context(config);
        Ok(self.tera.render("not_found.html", &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(title: &str) -> PostView {
        PostView {
            title: title.to_string(),
            date: "Jan  1, 2024".to_string(),
            path: "/n/test".to_string(),
            description: Some("A test".to_string()),
            tags: vec!["rust".to_string()],
            content: "<p>Hello</p>".to_string(),
        }
    }

    #[test]
    fn index_lists_posts() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer
            .render_index(&SiteConfig::default(), &[view("First"), view("Second")])
            .unwrap();
        assert!(html.contains("First"));
        assert!(html.contains("Second"));
        assert!(html.contains("/n/test"));
    }

    #[test]
    fn post_page_escapes_title_but_not_content() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut post = view("Tags <& co>");
        post.content = "<p>Raw <em>html</em></p>".to_string();
        let html = renderer.render_post(&SiteConfig::default(), &post).unwrap();
        assert!(html.contains("Tags &lt;&amp; co&gt;"));
        assert!(html.contains("<p>Raw <em>html</em></p>"));
    }

    #[test]
    fn not_found_renders() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer.render_not_found(&SiteConfig::default()).unwrap();
        assert!(html.contains("404"));
    }
}
