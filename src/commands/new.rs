//! Scaffold a new post file

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Create `<content_dir>/<slug>.mdx` with valid front matter.
/// New posts start as drafts unless `publish` is set.
pub fn run(site: &Site, title: &str, publish: bool) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("title {title:?} produces an empty slug");
    }

    let file_path = site.content_dir.join(format!("{slug}.mdx"));
    if file_path.exists() {
        anyhow::bail!("file already exists: {file_path:?}");
    }
    fs::create_dir_all(&site.content_dir)?;

    let date = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let content = format!(
        "---\ntitle: {}\ndate: {}\ndraft: {}\n---\n\n",
        yaml_quote(title),
        date,
        !publish
    );

    fs::write(&file_path, content)?;
    println!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Quote a string for a YAML scalar value
fn yaml_quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
