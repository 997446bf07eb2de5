//! RSS 2.0 feed rendering

use super::escape_xml;
use crate::config::SiteConfig;
use crate::content::{Collection, Post};

/// Render the RSS 2.0 feed for every published post, newest first.
///
/// Posts sharing a date keep their collection order (the sort is stable),
/// so repeated generations produce identical output.
pub fn render_rss(config: &SiteConfig, collection: &Collection) -> String {
    let mut posts: Vec<&Post> = collection.published().collect();
    posts.sort_by(|a, b| b.date.cmp(&a.date));

    let base = config.base_url();
    let mut out = String::new();

    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\">\n");
    out.push_str("  <channel>\n");
    out.push_str(&format!(
        "    <title>{}</title>\n",
        escape_xml(&config.title)
    ));
    out.push_str(&format!("    <link>{}</link>\n", escape_xml(base)));
    out.push_str(&format!(
        "    <description>{}</description>\n",
        escape_xml(&config.description)
    ));
    out.push_str(&format!(
        "    <language>{}</language>\n",
        escape_xml(&config.language)
    ));
    out.push_str(&format!(
        "    <atom:link href=\"{}/rss.xml\" rel=\"self\" type=\"application/rss+xml\"/>\n",
        escape_xml(base)
    ));

    for post in posts {
        let url = format!("{}{}", base, post.url_path());
        out.push_str("    <item>\n");
        out.push_str(&format!(
            "      <title>{}</title>\n",
            escape_xml(&post.title)
        ));
        out.push_str(&format!("      <link>{}</link>\n", escape_xml(&url)));
        out.push_str(&format!(
            "      <guid isPermaLink=\"true\">{}</guid>\n",
            escape_xml(&url)
        ));
        out.push_str(&format!(
            "      <pubDate>{}</pubDate>\n",
            post.date.to_rfc2822()
        ));
        if let Some(description) = &post.description {
            out.push_str(&format!(
                "      <description>{}</description>\n",
                escape_xml(description)
            ));
        }
        out.push_str("    </item>\n");
    }

    out.push_str("  </channel>\n");
    out.push_str("</rss>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostMeta;
    use chrono::DateTime;
    use std::path::PathBuf;

    fn post(path: &str, title: &str, date: &str, draft: bool) -> Post {
        Post {
            meta: PostMeta {
                path: path.to_string(),
                source: PathBuf::from(format!("{path}.mdx")),
            },
            title: title.to_string(),
            date: DateTime::parse_from_rfc3339(date).unwrap(),
            description: Some(format!("About {title}")),
            draft,
            tags: Vec::new(),
            raw: String::new(),
            content: String::new(),
        }
    }

    fn config() -> SiteConfig {
        SiteConfig {
            url: "https://example.com".to_string(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn newest_post_listed_first() {
        let collection = Collection::new(vec![
            post("jan", "January", "2024-01-01T00:00:00Z", false),
            post("jun", "June", "2024-06-01T00:00:00Z", false),
        ]);
        let rss = render_rss(&config(), &collection);
        let jan = rss.find("/n/jan").unwrap();
        let jun = rss.find("/n/jun").unwrap();
        assert!(jun < jan, "2024-06-01 item must come before 2024-01-01");
    }

    #[test]
    fn drafts_never_appear() {
        let collection = Collection::new(vec![
            post("pub", "Published", "2024-01-01T00:00:00Z", false),
            post("wip", "Secret draft", "2024-02-01T00:00:00Z", true),
        ]);
        let rss = render_rss(&config(), &collection);
        assert!(rss.contains("/n/pub"));
        assert!(!rss.contains("/n/wip"));
        assert!(!rss.contains("Secret draft"));
    }

    #[test]
    fn reserved_characters_escaped_in_title() {
        let mut p = post("esc", "ignored", "2024-01-01T00:00:00Z", false);
        p.title = r#"Ampersands & <tags> and "quotes""#.to_string();
        p.description = None;
        let rss = render_rss(&config(), &Collection::new(vec![p]));
        assert!(rss.contains("Ampersands &amp; &lt;tags&gt; and &quot;quotes&quot;"));
        assert!(!rss.contains("<tags>"));
    }

    #[test]
    fn equal_dates_keep_collection_order() {
        let collection = Collection::new(vec![
            post("first", "First", "2024-01-01T00:00:00Z", false),
            post("second", "Second", "2024-01-01T00:00:00Z", false),
        ]);
        let a = render_rss(&config(), &collection);
        let b = render_rss(&config(), &collection);
        assert_eq!(a, b);
        assert!(a.find("/n/first").unwrap() < a.find("/n/second").unwrap());
    }

    #[test]
    fn items_carry_guid_and_rfc2822_pubdate() {
        let collection = Collection::new(vec![post("p", "P", "2024-01-15T10:30:00Z", false)]);
        let rss = render_rss(&config(), &collection);
        assert!(rss.contains("<guid isPermaLink=\"true\">https://example.com/n/p</guid>"));
        assert!(rss.contains("<pubDate>Mon, 15 Jan 2024 10:30:00 +0000</pubDate>"));
    }

    #[test]
    fn missing_description_omits_element() {
        let mut p = post("bare", "Bare", "2024-01-01T00:00:00Z", false);
        p.description = None;
        let rss = render_rss(&config(), &Collection::new(vec![p]));
        let items = rss.split("<item>").nth(1).unwrap();
        assert!(!items.contains("<description>"));
    }
}
