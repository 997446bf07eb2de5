//! The content collection and its atomically swappable store
//!
//! A [`Collection`] is an immutable snapshot of every compiled post, in
//! discovery order. The [`ContentStore`] hands out snapshots to request
//! handlers lock-free and replaces the whole collection in one swap during
//! a reload; readers never observe a partially-rebuilt state.

use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::Post;

/// An ordered, read-only set of compiled posts keyed by slug
#[derive(Debug, Default)]
pub struct Collection {
    posts: Vec<Post>,
    index: HashMap<String, usize>,
}

impl Collection {
    /// Build a collection from posts in discovery order. Slug uniqueness is
    /// enforced by the loader before this point.
    pub fn new(posts: Vec<Post>) -> Self {
        let index = posts
            .iter()
            .enumerate()
            .map(|(i, p)| (p.meta.path.clone(), i))
            .collect();
        Self { posts, index }
    }

    /// Every post, drafts included, in discovery order
    pub fn all(&self) -> &[Post] {
        &self.posts
    }

    /// Non-draft posts in discovery order
    pub fn published(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|p| !p.draft)
    }

    /// Look up a post by its slug
    pub fn find_by_path(&self, path: &str) -> Option<&Post> {
        self.index.get(path).map(|&i| &self.posts[i])
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Process-wide holder of the current collection snapshot
pub struct ContentStore {
    current: ArcSwap<Collection>,
    // Serializes load passes: a second reload trigger waits for the first
    // to finish instead of interleaving with it.
    reload: Mutex<()>,
}

impl ContentStore {
    pub fn new(collection: Collection) -> Self {
        Self {
            current: ArcSwap::from_pointee(collection),
            reload: Mutex::new(()),
        }
    }

    /// The current snapshot. Cheap and lock-free; callers keep the `Arc`
    /// for the duration of a request.
    pub fn snapshot(&self) -> Arc<Collection> {
        self.current.load_full()
    }

    /// Run a full load pass and swap the result in atomically.
    ///
    /// The whole new collection is built before the swap; on failure the
    /// previous snapshot stays in place untouched.
    pub fn reload<F, E>(&self, load: F) -> Result<(), E>
    where
        F: FnOnce() -> Result<Collection, E>,
    {
        let _guard = self.reload.lock().expect("reload lock poisoned");
        let next = load()?;
        self.current.store(Arc::new(next));
        Ok(())
    }
}
