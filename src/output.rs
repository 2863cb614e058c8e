//! CLI output formatting for both pipeline stages.
//!
//! # Information-First Display
//!
//! Every record is shown by its semantic identity first (positional index
//! and title) with file paths as indented context lines, so the output reads
//! as a content inventory while still pointing back to the source files.
//!
//! ## Scan
//!
//! ```text
//! Categories
//!     001 Programming (2 posts)
//!         Source: categories/programming.json
//!
//! Posts
//!     001 Hello World
//!         Source: posts/hello-world.md
//!         Slug: hello-world
//!         Category: Programming
//!
//! Config
//!     config.toml
//! ```
//!
//! ## Generate
//!
//! ```text
//! Categories → categories.json (3 records)
//!     URL: https://example.github.io/blog/categories.json
//! Posts → posts.json (4 records, reference)
//!     URL: https://example.github.io/blog/posts.json
//!
//! Generated 2 endpoints
//! ```
//!
//! Each stage has a `format_*` function returning lines and a `print_*`
//! wrapper that writes them to stdout.

use crate::config::SiteConfig;
use crate::endpoints::{CATEGORIES_ROUTE, Endpoint, POSTS_ROUTE};
use crate::scan::Manifest;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing the validated collections.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Categories".to_string());
    for (i, entry) in manifest.categories.iter().enumerate() {
        let count = manifest
            .posts
            .iter()
            .filter(|p| p.category.id() == entry.category.id)
            .count();
        lines.push(format!(
            "{}{} {} ({})",
            indent(1),
            format_index(i + 1),
            entry.category.name,
            plural(count, "post", "posts")
        ));
        lines.push(format!("{}Source: {}", indent(2), entry.source));
    }

    lines.push(String::new());
    lines.push("Posts".to_string());
    for (i, post) in manifest.posts.iter().enumerate() {
        lines.push(format!(
            "{}{} {}",
            indent(1),
            format_index(i + 1),
            post.title
        ));
        lines.push(format!("{}Source: {}", indent(2), post.source));
        lines.push(format!("{}Slug: {}", indent(2), post.slug));
        let category = match &post.category {
            r if r.is_resolved() => r.name().unwrap_or(r.id()).to_string(),
            r => format!("{} (unchecked)", r.id()),
        };
        lines.push(format!("{}Category: {}", indent(2), category));
        let description = truncate_desc(post.description.trim(), 60);
        if !description.is_empty() {
            lines.push(format!("{}{}", indent(2), description));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    } else {
        lines.push(format!("{}(defaults)", indent(1)));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

/// Format generate stage output: one entry per written endpoint.
pub fn format_generate_output(endpoints: &[Endpoint], config: &SiteConfig) -> Vec<String> {
    let mut lines = Vec::new();

    for endpoint in endpoints {
        let label = match endpoint.route {
            CATEGORIES_ROUTE => "Categories",
            POSTS_ROUTE => "Posts",
            other => other,
        };
        let records = plural(endpoint.records, "record", "records");
        let detail = if endpoint.route == POSTS_ROUTE {
            format!("{records}, {}", config.api.posts.as_str())
        } else {
            records
        };
        lines.push(format!(
            "{} \u{2192} {} ({})",
            label,
            endpoint.file_name(),
            detail
        ));
        lines.push(format!(
            "{}URL: {}",
            indent(1),
            config.public_url(endpoint.route)
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}",
        plural(endpoints.len(), "endpoint", "endpoints")
    ));
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(endpoints: &[Endpoint], config: &SiteConfig) {
    for line in format_generate_output(endpoints, config) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
