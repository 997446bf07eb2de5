//! Sitemap XML rendering

use chrono::{DateTime, SecondsFormat, Utc};

use super::escape_xml;
use crate::config::SiteConfig;
use crate::content::Collection;

/// Static routes always present in the sitemap: home and the post listing
pub const STATIC_PATHS: &[&str] = &["/", "/posts"];

/// Render the sitemap: the static routes stamped with `now`, then one
/// `<url>` per published post stamped with its publication date.
pub fn render_sitemap(
    config: &SiteConfig,
    collection: &Collection,
    now: DateTime<Utc>,
) -> String {
    let base = config.base_url();
    let mut out = String::new();

    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    let now_stamp = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    for path in STATIC_PATHS {
        push_url(&mut out, &format!("{base}{path}"), &now_stamp);
    }

    for post in collection.published() {
        push_url(
            &mut out,
            &format!("{}{}", base, post.url_path()),
            &post.date.to_rfc3339(),
        );
    }

    out.push_str("</urlset>\n");
    out
}

fn push_url(out: &mut String, loc: &str, lastmod: &str) {
    out.push_str("  <url>\n");
    out.push_str(&format!("    <loc>{}</loc>\n", escape_xml(loc)));
    out.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
    out.push_str("  </url>\n");
}
