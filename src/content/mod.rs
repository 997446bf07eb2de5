//! Content module - loading, validation, compilation, and the collection

mod collection;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use collection::{Collection, ContentStore};
pub use frontmatter::{FrontMatter, RawDocument};
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use post::{Post, PostMeta};
