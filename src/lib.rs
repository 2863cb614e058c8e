//! # Simple Blog
//!
//! A minimal static blog engine. Posts are markdown files with YAML
//! front-matter, categories are small data files, and the published output
//! is a pair of JSON endpoints any static host can serve.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (files → validated records)
//! 2. Generate  manifest  →  dist/            (records → JSON endpoints)
//! ```
//!
//! The manifest between the stages is human-readable JSON, so a failed or
//! surprising build can be inspected without re-running the scan.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks `content/`, validates every file, produces the manifest |
//! | [`generate`] | Stage 2: writes `posts.json` and `categories.json` from the manifest |
//! | [`schema`] | Typed post/category records and their pure validation functions |
//! | [`collection`] | `ContentStore`: uniqueness checks and the post → category join |
//! | [`endpoints`] | The two JSON handlers, post projections and reading time |
//! | [`frontmatter`] | Splits `---` fenced YAML blocks from markdown bodies |
//! | [`naming`] | Slug and id derivation from file paths |
//! | [`config`] | `config.toml` loading over stock defaults and validation |
//! | [`types`] | Record types shared between stages |
//! | [`output`] | CLI output formatting for both stages |
//!
//! # Design Decisions
//!
//! ## Validation Is the Only Gate
//!
//! A file that fails its schema fails the build. There is no "skip and warn"
//! mode: a half-published collection is worse than none, and the error names
//! the file and field to fix.
//!
//! ## Explicit Store, No Global Cache
//!
//! Handlers receive a [`collection::ContentStore`] built once per build and
//! never mutated, instead of looking collections up by name from shared
//! state. Everything downstream of the scan is a pure function of it.
//!
//! ## Fixed Projections
//!
//! The fields of `/posts.json` are picked once in `config.toml`
//! (`[api] posts = ...`), never per request. Consumers get the same shape
//! for the lifetime of a deployment.

pub mod collection;
pub mod config;
pub mod endpoints;
pub mod frontmatter;
pub mod generate;
pub mod naming;
pub mod output;
pub mod scan;
pub mod schema;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
