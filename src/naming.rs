//! Slug and id derivation from content file paths.
//!
//! Every record gets its key from where it lives on disk unless it declares
//! one itself:
//!
//! - `posts/Hello World.md` → slug `hello-world`
//! - `posts/2024/First Steps.mdx` → slug `2024/first-steps`
//! - `posts/guide/index.md` → slug `guide`
//! - `categories/web-dev.json` → id `web-dev`
//!
//! Paths passed here are relative to the collection directory, not the
//! content root.

use std::path::Path;

/// Turn one path segment into a URL-safe slug.
///
/// Lowercases, turns whitespace into `-` and drops anything that is not
/// alphanumeric, `-` or `_`:
/// - `"Hello World"` → `"hello-world"`
/// - `"Rust & Serde!"` → `"rust--serde"`
/// - `"já-está"` → `"já-está"` (non-ASCII letters are kept)
pub fn slugify(segment: &str) -> String {
    segment
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('-')
            } else if c.is_alphanumeric() || c == '-' || c == '_' {
                Some(c)
            } else {
                None
            }
        })
        .collect()
}

/// Derive a post slug from its path inside the posts collection.
///
/// The extension is dropped, each segment is slugified and a trailing
/// `index` segment collapses onto its directory.
pub fn slug_from_path(rel: &Path) -> String {
    let without_ext = rel.with_extension("");
    let mut segments: Vec<String> = without_ext
        .components()
        .map(|c| slugify(&c.as_os_str().to_string_lossy()))
        .filter(|s| !s.is_empty())
        .collect();

    if segments.len() > 1 && segments.last().is_some_and(|s| s == "index") {
        segments.pop();
    }
    segments.join("/")
}

/// Derive a data-collection id: the path without its extension, `/`-joined.
pub fn entry_id(rel: &Path) -> String {
    rel.with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
