//! Derived-feed generators: RSS 2.0 and sitemap XML
//!
//! Both are pure functions of the collection snapshot; they never mutate it
//! and cache nothing. Every text field interpolated into XML goes through
//! [`escape_xml`].

mod rss;
mod sitemap;

pub use rss::render_rss;
pub use sitemap::{render_sitemap, STATIC_PATHS};

/// Escape the five reserved XML characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
