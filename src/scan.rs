//! Content scanning and manifest generation.
//!
//! Stage 1 of the build pipeline. Walks the content directory, validates
//! every file against its collection schema and produces a [`Manifest`]
//! that the generate stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Site configuration (optional)
//! ├── categories/                  # Data collection, one file per category
//! │   ├── programming.json         # {"name": "Programming"}
//! │   └── web-development.yaml     # name: Web Development
//! └── posts/                       # Content collection, one file per post
//!     ├── hello-world.md           # slug: hello-world
//!     ├── 2024/
//!     │   └── year-in-review.mdx   # slug: 2024/year-in-review
//!     └── _draft.md                # Leading underscore = ignored
//! ```
//!
//! ## Loading Rules
//!
//! - Files and directories starting with `.` or `_` are skipped
//! - Files are loaded in path order; that order is kept all the way to the
//!   JSON output
//! - Posts are `.md` / `.mdx` with a YAML front-matter block
//! - Categories are `.json`, `.yaml` or `.yml` data files
//! - A missing collection directory is an empty collection, not an error
//!
//! ## Validation
//!
//! Any file failing its schema fails the whole scan, as does a duplicate
//! slug or id, or (with checked references) a post naming an unknown
//! category. Nothing partial makes it into the manifest.

use crate::collection::{CollectionError, ContentStore};
use crate::config::{self, SiteConfig};
use crate::frontmatter::{self, FrontMatterError};
use crate::schema::{self, RawEntry, SchemaError};
use crate::types::{CategoryEntry, Post};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("{}: {source}", .path.display())]
    FrontMatter {
        path: PathBuf,
        source: FrontMatterError,
    },
    #[error("{}: invalid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{}: invalid YAML: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("{}: {source}", .path.display())]
    Schema { path: PathBuf, source: SchemaError },
    #[error(transparent)]
    Collection(#[from] CollectionError),
}

pub const POSTS_DIR: &str = "posts";
pub const CATEGORIES_DIR: &str = "categories";

const POST_EXTENSIONS: &[&str] = &["md", "mdx"];
const DATA_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// Manifest output from the scan stage.
///
/// Posts are stored after the reference join, so with checked references
/// every category already carries its name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub categories: Vec<CategoryEntry>,
    pub posts: Vec<Post>,
    pub config: SiteConfig,
}

impl Manifest {
    fn from_store(store: &ContentStore, config: SiteConfig) -> Self {
        Self {
            categories: store.category_entries().to_vec(),
            posts: store.posts().to_vec(),
            config,
        }
    }

    /// Rebuild the content store, re-checking collection invariants.
    pub fn into_store(self) -> Result<(ContentStore, SiteConfig), CollectionError> {
        let store = ContentStore::new(self.categories, self.posts, self.config.schema.references)?;
        Ok((store, self.config))
    }
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;
    let categories = load_categories(root)?;
    let posts = load_posts(root)?;
    let store = ContentStore::new(categories, posts, config.schema.references)?;
    Ok(Manifest::from_store(&store, config))
}

/// Load and validate every category data file.
fn load_categories(root: &Path) -> Result<Vec<CategoryEntry>, ScanError> {
    let mut categories = Vec::new();
    for file in collection_files(root, CATEGORIES_DIR, DATA_EXTENSIONS)? {
        let content = fs::read_to_string(&file.path)?;
        let data: serde_yaml::Value = if file.extension == "json" {
            serde_json::from_str(&content).map_err(|source| ScanError::Json {
                path: PathBuf::from(&file.source),
                source,
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|source| ScanError::Yaml {
                path: PathBuf::from(&file.source),
                source,
            })?
        };

        let raw = file.into_raw(data, String::new());
        let category = schema::validate_category(&raw).map_err(|source| ScanError::Schema {
            path: PathBuf::from(&raw.source),
            source,
        })?;
        categories.push(CategoryEntry {
            category,
            source: raw.source,
        });
    }
    Ok(categories)
}

/// Load and validate every post.
fn load_posts(root: &Path) -> Result<Vec<Post>, ScanError> {
    let mut posts = Vec::new();
    for file in collection_files(root, POSTS_DIR, POST_EXTENSIONS)? {
        let content = fs::read_to_string(&file.path)?;
        let (data, body) =
            frontmatter::parse(&content).map_err(|source| ScanError::FrontMatter {
                path: PathBuf::from(&file.source),
                source,
            })?;

        let raw = file.into_raw(data, body);
        let post = schema::validate_post(&raw).map_err(|source| ScanError::Schema {
            path: PathBuf::from(&raw.source),
            source,
        })?;
        posts.push(post);
    }
    Ok(posts)
}

/// A file found inside a collection directory.
struct CollectionFile {
    path: PathBuf,
    /// Relative to the content root.
    source: String,
    /// Relative to the collection directory.
    collection_path: PathBuf,
    extension: String,
}

impl CollectionFile {
    fn into_raw(self, data: serde_yaml::Value, body: String) -> RawEntry {
        RawEntry {
            source: self.source,
            collection_path: self.collection_path,
            data,
            body,
        }
    }
}

/// List a collection's files in path order, skipping ignored entries.
fn collection_files(
    root: &Path,
    collection: &str,
    extensions: &[&str],
) -> Result<Vec<CollectionFile>, ScanError> {
    let dir = root.join(collection);
    if !dir.is_dir() {
        warn!(collection, dir = %dir.display(), "collection directory not found, treating as empty");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(&dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !extensions.contains(&extension.as_str()) {
            debug!(path = %path.display(), collection, "skipping file with unsupported extension");
            continue;
        }

        let collection_path = path.strip_prefix(&dir).unwrap_or(&path).to_path_buf();
        let source = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .to_string();
        debug!(%source, collection, "found content file");
        files.push(CollectionFile {
            path,
            source,
            collection_path,
            extension,
        });
    }
    Ok(files)
}

fn is_ignored(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name.starts_with('_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::References;
    use crate::test_helpers::*;
    use crate::types::CategoryRef;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn post_md(title: &str, category: &str) -> String {
        format!(
            "---\ntitle: {title}\ndescription: About {title}\ndate: 2024-03-01\ncategory: {category}\n---\nBody of {title}\n"
        )
    }

    // =========================================================================
    // Fixture site
    // =========================================================================

    #[test]
    fn scan_finds_all_categories() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(
            category_ids(&manifest),
            vec!["personal", "programming", "web-development"]
        );
    }

    #[test]
    fn scan_finds_all_posts_in_path_order() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(
            post_slugs(&manifest),
            vec![
                "2024/year-in-review",
                "astro-vs-rust",
                "hello-world",
                "notes-on-serde"
            ]
        );
    }

    #[test]
    fn underscore_and_hidden_files_are_skipped() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        assert!(manifest.posts.iter().all(|p| !p.source.contains("_draft")));
        assert!(manifest.posts.iter().all(|p| !p.source.contains(".hidden")));
    }

    #[test]
    fn fixture_references_are_resolved() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let hello = find_post(&manifest, "hello-world");
        assert_eq!(hello.category.id(), "programming");
        assert_eq!(hello.category.name(), Some("Programming"));
    }

    #[test]
    fn yaml_category_loaded() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let web = find_category(&manifest, "web-development");
        assert_eq!(web.category.name, "Web Development");
        assert_eq!(web.source, "categories/web-development.yaml");
    }

    #[test]
    fn config_loaded_from_fixtures() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest.config.base, "/blog-con-x");
    }

    // =========================================================================
    // Hand-built trees
    // =========================================================================

    #[test]
    fn empty_content_root_is_empty_manifest() {
        let tmp = TempDir::new().unwrap();
        let manifest = scan(tmp.path()).unwrap();
        assert!(manifest.posts.is_empty());
        assert!(manifest.categories.is_empty());
        assert_eq!(manifest.config, SiteConfig::default());
    }

    #[test]
    fn unsupported_extensions_are_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "categories/rust.json", r#"{"name": "Rust"}"#);
        write(tmp.path(), "categories/README.txt", "not a category");
        write(tmp.path(), "posts/hello.md", &post_md("Hello", "rust"));
        write(tmp.path(), "posts/cover.png", "binary");

        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest.categories.len(), 1);
        assert_eq!(manifest.posts.len(), 1);
    }

    #[test]
    fn post_body_excludes_front_matter() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "categories/rust.json", r#"{"name": "Rust"}"#);
        write(tmp.path(), "posts/hello.md", &post_md("Hello", "rust"));

        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest.posts[0].body, "Body of Hello\n");
        assert_eq!(manifest.posts[0].source, "posts/hello.md");
    }

    #[test]
    fn schema_error_reports_file_and_field() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "posts/broken.md",
            "---\ntitle: Broken\ndate: 2024-01-01\ncategory: rust\n---\n",
        );

        let err = scan(tmp.path()).unwrap_err();
        match &err {
            ScanError::Schema { path, source } => {
                assert_eq!(path, &PathBuf::from("posts/broken.md"));
                assert_eq!(source.field(), Some("description"));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn category_without_name_is_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "categories/rust.json", r#"{"title": "Rust"}"#);
        let err = scan(tmp.path()).unwrap_err();
        assert!(matches!(err, ScanError::Schema { .. }));
    }

    #[test]
    fn invalid_json_category_is_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "categories/rust.json", "{ name: ");
        let err = scan(tmp.path()).unwrap_err();
        assert!(matches!(err, ScanError::Json { .. }));
    }

    #[test]
    fn unclosed_front_matter_is_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "posts/open.md", "---\ntitle: Open\n");
        let err = scan(tmp.path()).unwrap_err();
        assert!(matches!(err, ScanError::FrontMatter { .. }));
    }

    #[test]
    fn unknown_category_fails_scan() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "categories/rust.json", r#"{"name": "Rust"}"#);
        write(tmp.path(), "posts/hello.md", &post_md("Hello", "cooking"));

        let err = scan(tmp.path()).unwrap_err();
        assert!(matches!(
            err,
            ScanError::Collection(CollectionError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn opaque_references_skip_existence_check() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "config.toml", "[schema]\nreferences = \"opaque\"\n");
        write(tmp.path(), "posts/hello.md", &post_md("Hello", "cooking"));

        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest.config.schema.references, References::Opaque);
        assert_eq!(
            manifest.posts[0].category,
            CategoryRef::Id {
                id: "cooking".to_string()
            }
        );
    }

    #[test]
    fn duplicate_slug_across_files_fails_scan() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "categories/rust.json", r#"{"name": "Rust"}"#);
        write(tmp.path(), "posts/hello.md", &post_md("Hello", "rust"));
        write(
            tmp.path(),
            "posts/other.md",
            "---\ntitle: Other\ndescription: d\ndate: 2024-01-01\ncategory: rust\nslug: hello\n---\n",
        );

        let err = scan(tmp.path()).unwrap_err();
        match err {
            ScanError::Collection(CollectionError::DuplicateSlug {
                slug,
                first,
                second,
            }) => {
                assert_eq!(slug, "hello");
                assert_eq!(first, "posts/hello.md");
                assert_eq!(second, "posts/other.md");
            }
            other => panic!("expected duplicate slug, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_category_id_across_formats_fails_scan() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "categories/rust.json", r#"{"name": "Rust"}"#);
        write(tmp.path(), "categories/rust.yaml", "name: Rust Again\n");

        let err = scan(tmp.path()).unwrap_err();
        assert!(matches!(
            err,
            ScanError::Collection(CollectionError::DuplicateCategory { .. })
        ));
    }

    #[test]
    fn manifest_roundtrips_into_store() {
        let tmp = setup_fixtures();
        let manifest = scan(tmp.path()).unwrap();
        let json = serde_json::to_string(&manifest).unwrap();
        let restored: Manifest = serde_json::from_str(&json).unwrap();

        let (store, config) = restored.into_store().unwrap();
        assert_eq!(store.posts().len(), manifest.posts.len());
        assert_eq!(store.posts(), manifest.posts.as_slice());
        assert_eq!(config, manifest.config);
    }
}
