//! Site configuration module.
//!
//! Loads and validates `config.toml`. The file lives in
//! the content root and is layered over stock defaults, so it only needs the
//! keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site = ""                 # Public origin, e.g. "https://example.github.io"
//! base = "/"                # Path prefix the site is served under
//!
//! [schema]
//! references = "checked"    # "checked" | "opaque"
//!
//! [api]
//! posts = "reference"       # "reference" | "with-body" | "reading-time" | "flat"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Public origin the site is deployed to. Empty when unknown.
    pub site: String,
    /// Path prefix under which the site is served.
    pub base: String,
    /// Content schema settings.
    pub schema: SchemaConfig,
    /// JSON endpoint settings.
    pub api: ApiConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: String::new(),
            base: "/".to_string(),
            schema: SchemaConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are well-formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "base must start with '/', got {:?}",
                self.base
            )));
        }
        if !self.site.is_empty()
            && !(self.site.starts_with("http://") || self.site.starts_with("https://"))
        {
            return Err(ConfigError::Validation(format!(
                "site must be an http(s) URL, got {:?}",
                self.site
            )));
        }
        Ok(())
    }

    /// Public URL of a route, honoring `site` and `base`.
    ///
    /// Without a `site` the result is an absolute path.
    pub fn public_url(&self, route: &str) -> String {
        let base = self.base.trim_end_matches('/');
        let route = route.trim_start_matches('/');
        format!("{}{}/{}", self.site.trim_end_matches('/'), base, route)
    }
}

/// How post → category references are treated at load time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum References {
    /// Every reference must name an existing category and is resolved to `{id, name}`.
    #[default]
    Checked,
    /// References are kept as bare ids and never checked.
    Opaque,
}

/// Content schema settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    pub references: References,
}

/// Field list of each element in `/posts.json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostShape {
    /// `title, description, pubDate, slug, category`
    #[default]
    Reference,
    /// `title, description, pubDate, slug, body, category`
    WithBody,
    /// `title, description, pubDate, slug, category, readingTime`
    ReadingTime,
    /// `title, description, pubDate, slug, categoryId`
    Flat,
}

impl PostShape {
    /// The name used in `config.toml`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PostShape::Reference => "reference",
            PostShape::WithBody => "with-body",
            PostShape::ReadingTime => "reading-time",
            PostShape::Flat => "flat",
        }
    }
}

/// JSON endpoint settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    pub posts: PostShape,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Parse `config.toml` text and validate it.
///
/// Every section is `#[serde(default)]`, so a file only lists the keys it
/// changes and the rest keep their stock values.
pub fn parse_config(text: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Load `config.toml` from the content root. A missing file means defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let path = root.join("config.toml");
    match fs::read_to_string(&path) {
        Ok(text) => {
            debug!(path = %path.display(), "loading config");
            parse_config(&text)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(root = %root.display(), "no config.toml, using defaults");
            Ok(SiteConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Blog Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Place this file at content/config.toml.
# Unknown keys will cause an error.

# Public origin the site is deployed to, e.g. "https://example.github.io".
# Only used to print full endpoint URLs.
site = ""

# Path prefix the site is served under, e.g. "/my-blog".
base = "/"

# ---------------------------------------------------------------------------
# Content schema
# ---------------------------------------------------------------------------
[schema]
# "checked": every post's category must exist in content/categories/ and is
#            published as {id, name}.
# "opaque":  category ids are published as {id} without being checked.
references = "checked"

# ---------------------------------------------------------------------------
# JSON endpoints
# ---------------------------------------------------------------------------
[api]
# Fields of each element in /posts.json:
#   "reference"     title, description, pubDate, slug, category
#   "with-body"     title, description, pubDate, slug, body, category
#   "reading-time"  title, description, pubDate, slug, category, readingTime
#   "flat"          title, description, pubDate, slug, categoryId
posts = "reference"
"##
}
