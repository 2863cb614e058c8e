//! JSON endpoint generation.
//!
//! Stage 2 of the build pipeline. Reads the scan manifest, rebuilds the
//! content store and writes every endpoint's response body into the output
//! directory, where a static file server answers `GET /posts.json` and
//! `GET /categories.json` with it.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── categories.json
//! └── posts.json
//! ```
//!
//! Files are written at the output root regardless of `base`; the prefix
//! only matters to whoever serves the directory.

use crate::collection::{CollectionError, ContentStore};
use crate::config::SiteConfig;
use crate::endpoints::{self, Endpoint, EndpointError};
use crate::scan::Manifest;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Manifest error: {0}")]
    Collection(#[from] CollectionError),
    #[error("Endpoint error: {0}")]
    Endpoint(#[from] EndpointError),
}

/// What a generate run wrote, plus the config it was written with.
#[derive(Debug)]
pub struct Generated {
    pub endpoints: Vec<Endpoint>,
    pub config: SiteConfig,
}

/// Generate the site from a manifest file written by the scan stage.
pub fn generate(manifest_path: &Path, output_dir: &Path) -> Result<Generated, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;
    let (store, config) = manifest.into_store()?;
    let endpoints = write_endpoints(&store, &config, output_dir)?;
    Ok(Generated { endpoints, config })
}

/// Render every endpoint and write it under `output_dir`.
pub fn write_endpoints(
    store: &ContentStore,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<Vec<Endpoint>, GenerateError> {
    fs::create_dir_all(output_dir)?;

    let rendered = endpoints::render_all(store, config)?;
    for endpoint in &rendered {
        let path = output_dir.join(endpoint.file_name());
        fs::write(&path, &endpoint.body)?;
        info!(
            route = endpoint.route,
            records = endpoint.records,
            path = %path.display(),
            "wrote endpoint"
        );
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PostShape, References};
    use crate::scan;
    use crate::test_helpers::setup_fixtures;
    use tempfile::TempDir;

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn writes_both_endpoint_files() {
        let store = ContentStore::new(vec![], vec![], References::Checked).unwrap();
        let out = TempDir::new().unwrap();

        let written = write_endpoints(&store, &SiteConfig::default(), out.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(fs::read_to_string(out.path().join("posts.json")).unwrap(), "[]");
        assert_eq!(
            fs::read_to_string(out.path().join("categories.json")).unwrap(),
            "[]"
        );
    }

    #[test]
    fn creates_missing_output_dir() {
        let store = ContentStore::new(vec![], vec![], References::Checked).unwrap();
        let out = TempDir::new().unwrap();
        let nested = out.path().join("deep/dist");

        write_endpoints(&store, &SiteConfig::default(), &nested).unwrap();
        assert!(nested.join("posts.json").exists());
    }

    #[test]
    fn generate_from_manifest_file() {
        let content = setup_fixtures();
        let manifest = scan::scan(content.path()).unwrap();
        let work = TempDir::new().unwrap();
        let manifest_path = work.path().join("manifest.json");
        fs::write(&manifest_path, serde_json::to_string(&manifest).unwrap()).unwrap();

        let out = work.path().join("dist");
        let written = generate(&manifest_path, &out).unwrap();

        let posts = read_json(&out.join("posts.json"));
        let categories = read_json(&out.join("categories.json"));
        assert_eq!(posts.as_array().unwrap().len(), manifest.posts.len());
        assert_eq!(
            categories.as_array().unwrap().len(),
            manifest.categories.len()
        );
        assert!(written.endpoints.iter().all(|e| e.status == 200));
        assert_eq!(written.config, manifest.config);
    }

    #[test]
    fn generate_uses_manifest_shape() {
        let content = setup_fixtures();
        let mut manifest = scan::scan(content.path()).unwrap();
        manifest.config.api.posts = PostShape::ReadingTime;

        let work = TempDir::new().unwrap();
        let manifest_path = work.path().join("manifest.json");
        fs::write(&manifest_path, serde_json::to_string(&manifest).unwrap()).unwrap();

        let out = work.path().join("dist");
        let generated = generate(&manifest_path, &out).unwrap();
        assert_eq!(generated.config.api.posts, PostShape::ReadingTime);

        let posts = read_json(&out.join("posts.json"));
        for post in posts.as_array().unwrap() {
            assert!(post.get("readingTime").is_some());
        }
    }

    #[test]
    fn tampered_manifest_with_duplicate_slug_is_rejected() {
        let content = setup_fixtures();
        let mut manifest = scan::scan(content.path()).unwrap();
        let dup = manifest.posts[0].clone();
        manifest.posts.push(dup);

        let work = TempDir::new().unwrap();
        let manifest_path = work.path().join("manifest.json");
        fs::write(&manifest_path, serde_json::to_string(&manifest).unwrap()).unwrap();

        let result = generate(&manifest_path, &work.path().join("dist"));
        assert!(matches!(
            result,
            Err(GenerateError::Collection(CollectionError::DuplicateSlug { .. }))
        ));
    }

    #[test]
    fn missing_manifest_is_io_error() {
        let work = TempDir::new().unwrap();
        let result = generate(&work.path().join("nope.json"), work.path());
        assert!(matches!(result, Err(GenerateError::Io(_))));
    }
}
