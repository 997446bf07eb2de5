//! List site content

use anyhow::Result;

use crate::content::Post;
use crate::Site;

/// Print all posts, newest first, with drafts marked
pub fn run(site: &Site) -> Result<()> {
    let collection = site.load_collection()?;

    let mut posts: Vec<&Post> = collection.all().iter().collect();
    posts.sort_by(|a, b| b.date.cmp(&a.date));

    println!("Posts ({}):", posts.len());
    for post in posts {
        let marker = if post.draft { " [draft]" } else { "" };
        println!(
            "  {} - {}{} ({})",
            post.date.format("%Y-%m-%d"),
            post.title,
            marker,
            post.meta.path
        );
    }
    Ok(())
}
