//! Content loader: discovers source files and runs the load pass
//!
//! A load pass is all-or-nothing. The first read, schema, compile, or
//! duplicate-slug failure aborts the pass naming the offending file, so a
//! collection is only ever built from a fully valid source snapshot.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{Collection, FrontMatter, MarkdownRenderer, Post, PostMeta, RawDocument};
use crate::error::PipelineError;

/// Loads and compiles every content file under a content root
pub struct ContentLoader {
    content_dir: PathBuf,
    include: glob::Pattern,
    // A leading `**/` must also match files directly at the content root;
    // the precompiled suffix pattern covers that case.
    include_flat: Option<glob::Pattern>,
    renderer: MarkdownRenderer,
}

impl ContentLoader {
    /// Create a loader for `content_dir`, including files whose path
    /// relative to it matches `include` (e.g. `**/*.mdx`).
    pub fn new(content_dir: impl Into<PathBuf>, include: &str) -> anyhow::Result<Self> {
        let pattern = glob::Pattern::new(include)
            .map_err(|e| anyhow::anyhow!("invalid include pattern {include:?}: {e}"))?;
        let include_flat = include
            .strip_prefix("**/")
            .and_then(|suffix| glob::Pattern::new(suffix).ok());
        Ok(Self {
            content_dir: content_dir.into(),
            include: pattern,
            include_flat,
            renderer: MarkdownRenderer::new(),
        })
    }

    fn matches_include(&self, rel: &str) -> bool {
        self.include.matches(rel)
            || self
                .include_flat
                .as_ref()
                .is_some_and(|p| p.matches(rel))
    }

    /// Run a full load pass and build the collection.
    pub fn load(&self) -> Result<Collection, PipelineError> {
        let mut posts = Vec::new();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        if !self.content_dir.exists() {
            tracing::warn!("content directory {:?} does not exist", self.content_dir);
            return Ok(Collection::new(posts));
        }

        // Sorted walk keeps discovery order deterministic across platforms.
        for entry in WalkDir::new(&self.content_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            // An unreadable directory or dangling symlink aborts the pass
            // like any other read failure; skipping it would leave a
            // silently partial collection.
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .unwrap_or(&self.content_dir)
                    .to_path_buf();
                PipelineError::Load {
                    path,
                    source: e.into_io_error().unwrap_or_else(|| {
                        std::io::Error::new(std::io::ErrorKind::Other, "directory walk failed")
                    }),
                }
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let rel = path.strip_prefix(&self.content_dir).unwrap_or(path);
            let rel_str = normalize_separators(rel);
            if !self.matches_include(&rel_str) {
                continue;
            }

            let post = self.load_post(path, rel)?;

            if let Some(first) = seen.get(&post.meta.path) {
                return Err(PipelineError::DuplicatePath {
                    slug: post.meta.path.clone(),
                    first: first.clone(),
                    second: path.to_path_buf(),
                });
            }
            seen.insert(post.meta.path.clone(), path.to_path_buf());

            tracing::debug!("loaded {} from {:?}", post.meta.path, rel);
            posts.push(post);
        }

        tracing::info!("loaded {} posts from {:?}", posts.len(), self.content_dir);
        Ok(Collection::new(posts))
    }

    /// Load, validate, and compile a single source file.
    fn load_post(&self, path: &Path, rel: &Path) -> Result<Post, PipelineError> {
        let contents = fs::read_to_string(path).map_err(|source| PipelineError::Load {
            path: path.to_path_buf(),
            source,
        })?;

        let raw = RawDocument::parse(path, rel, &contents)?;
        let fm = FrontMatter::validate(&raw)?;
        let content = self.renderer.render(&raw.body, path)?;

        Ok(Post {
            meta: PostMeta {
                path: slug_for(rel),
                source: path.to_path_buf(),
            },
            title: fm.title,
            date: fm.date,
            description: fm.description,
            draft: fm.draft,
            tags: fm.tags,
            raw: raw.body,
            content,
        })
    }
}

/// Derive the public slug: the relative path without its extension,
/// `/`-separated regardless of platform.
fn slug_for(rel: &Path) -> String {
    normalize_separators(&rel.with_extension(""))
}

fn normalize_separators(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, rel: &str, contents: &str) {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn post_file(title: &str, date: &str) -> String {
        format!("---\ntitle: {title}\ndate: {date}\n---\n\nBody of {title}.\n")
    }

    #[test]
    fn discovers_matching_files_with_derived_slugs() {
        let dir = TempDir::new().unwrap();
        write(&dir, "hello.mdx", &post_file("Hello", "2024-01-01T00:00:00Z"));
        write(
            &dir,
            "2024/deep/note.mdx",
            &post_file("Note", "2024-06-01T00:00:00Z"),
        );
        write(&dir, "ignored.txt", "not content");

        let loader = ContentLoader::new(dir.path(), "**/*.mdx").unwrap();
        let collection = loader.load().unwrap();

        assert_eq!(collection.len(), 2);
        assert!(collection.find_by_path("hello").is_some());
        assert!(collection.find_by_path("2024/deep/note").is_some());
        assert!(collection.find_by_path("ignored").is_none());
    }

    #[test]
    fn discovery_order_is_deterministic() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.mdx", &post_file("B", "2024-01-01T00:00:00Z"));
        write(&dir, "a.mdx", &post_file("A", "2024-01-01T00:00:00Z"));

        let loader = ContentLoader::new(dir.path(), "**/*.mdx").unwrap();
        let collection = loader.load().unwrap();
        let slugs: Vec<_> = collection.all().iter().map(|p| p.meta.path.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b"]);
    }

    #[test]
    fn compiled_body_contains_source_text() {
        let dir = TempDir::new().unwrap();
        write(&dir, "p.mdx", &post_file("P", "2024-01-01T00:00:00Z"));

        let loader = ContentLoader::new(dir.path(), "**/*.mdx").unwrap();
        let collection = loader.load().unwrap();
        let post = collection.find_by_path("p").unwrap();
        assert!(post.content.contains("Body of P."));
    }

    #[test]
    fn schema_error_aborts_whole_pass() {
        let dir = TempDir::new().unwrap();
        write(&dir, "good.mdx", &post_file("Good", "2024-01-01T00:00:00Z"));
        write(&dir, "bad.mdx", "---\ndescription: missing title and date\n---\n");

        let loader = ContentLoader::new(dir.path(), "**/*.mdx").unwrap();
        let err = loader.load().unwrap_err();
        assert!(matches!(err, PipelineError::Schema { .. }));
    }

    #[test]
    fn duplicate_slugs_abort_the_pass() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.md", &post_file("One", "2024-01-01T00:00:00Z"));
        write(&dir, "a.mdx", &post_file("Two", "2024-01-01T00:00:00Z"));

        let loader = ContentLoader::new(dir.path(), "**/*.m*").unwrap();
        let err = loader.load().unwrap_err();
        assert!(matches!(err, PipelineError::DuplicatePath { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn broken_symlink_aborts_the_pass() {
        let dir = TempDir::new().unwrap();
        write(&dir, "good.mdx", &post_file("Good", "2024-01-01T00:00:00Z"));
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("ghost.mdx"))
            .unwrap();

        let loader = ContentLoader::new(dir.path(), "**/*.mdx").unwrap();
        let err = loader.load().unwrap_err();
        assert!(matches!(err, PipelineError::Load { .. }));
    }

    #[test]
    fn missing_content_dir_yields_empty_collection() {
        let dir = TempDir::new().unwrap();
        let loader = ContentLoader::new(dir.path().join("nope"), "**/*.mdx").unwrap();
        assert!(loader.load().unwrap().is_empty());
    }

    #[test]
    fn invalid_include_pattern_is_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(ContentLoader::new(dir.path(), "[").is_err());
    }
}
