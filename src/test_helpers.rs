//! Shared test utilities for the simple-blog test suite.
//!
//! Provides fixture setup plus lookups and extractors over the scan
//! [`Manifest`]. Lookups panic with the available keys on a miss so a failing
//! test says what it did find.

use std::path::Path;
use tempfile::TempDir;

use crate::scan::Manifest;
use crate::types::{CategoryEntry, Post};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Manifest lookups
// =========================================================================

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(manifest: &'a Manifest, slug: &str) -> &'a Post {
    manifest
        .posts
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| panic!("post '{slug}' not found. Available: {:?}", post_slugs(manifest)))
}

/// Find a category by id. Panics if not found.
pub fn find_category<'a>(manifest: &'a Manifest, id: &str) -> &'a CategoryEntry {
    manifest
        .categories
        .iter()
        .find(|c| c.category.id == id)
        .unwrap_or_else(|| {
            panic!(
                "category '{id}' not found. Available: {:?}",
                category_ids(manifest)
            )
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All post slugs in load order.
pub fn post_slugs(manifest: &Manifest) -> Vec<&str> {
    manifest.posts.iter().map(|p| p.slug.as_str()).collect()
}

/// All category ids in load order.
pub fn category_ids(manifest: &Manifest) -> Vec<&str> {
    manifest
        .categories
        .iter()
        .map(|c| c.category.id.as_str())
        .collect()
}
