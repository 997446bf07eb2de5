//! Validate all content without serving
//!
//! Runs a full load pass: discovery, schema validation, compilation, slug
//! uniqueness. Exits non-zero on the first failure, naming the file.

use anyhow::Result;

use crate::Site;

pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();
    let collection = site.load_collection()?;
    let drafts = collection.all().iter().filter(|p| p.draft).count();

    println!(
        "OK: {} posts ({} drafts) compiled in {:.2}s",
        collection.len(),
        drafts,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
