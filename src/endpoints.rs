//! The public JSON endpoints.
//!
//! Two read-only handlers turn the [`ContentStore`] into response bodies:
//!
//! | Route | Body |
//! |-------|------|
//! | `/categories.json` | `[{id, name}, ...]` in load order |
//! | `/posts.json` | one projection per post, field list fixed by [`PostShape`] |
//!
//! Handlers are pure: they never touch the filesystem and never filter,
//! sort or paginate. The generate stage writes their output to disk.

use crate::collection::ContentStore;
use crate::config::{PostShape, SiteConfig};
use crate::types::{CategoryRef, Post};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use thiserror::Error;

pub const CATEGORIES_ROUTE: &str = "/categories.json";
pub const POSTS_ROUTE: &str = "/posts.json";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Reading speed used for `readingTime`.
pub const WORDS_PER_MINUTE: usize = 200;

#[derive(Error, Debug)]
pub enum EndpointError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A rendered endpoint response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub route: &'static str,
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    /// Number of records in the body array.
    pub records: usize,
}

impl Endpoint {
    fn json<T: Serialize>(route: &'static str, items: &[T]) -> Result<Self, EndpointError> {
        Ok(Self {
            route,
            status: 200,
            content_type: JSON_CONTENT_TYPE,
            body: serde_json::to_string(items)?,
            records: items.len(),
        })
    }

    /// Output file name relative to the site root (`posts.json`).
    pub fn file_name(&self) -> &'static str {
        self.route.trim_start_matches('/')
    }
}

#[derive(Serialize)]
struct CategoryItem<'a> {
    id: &'a str,
    name: &'a str,
}

/// One element of `/posts.json`.
///
/// Optional fields are left out of the JSON entirely when `None`, which is
/// how each [`PostShape`] gets its exact key set.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostItem<'a> {
    title: &'a str,
    description: &'a str,
    #[serde(serialize_with = "serialize_js_date")]
    pub_date: DateTime<Utc>,
    slug: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a CategoryRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reading_time: Option<u32>,
}

impl<'a> PostItem<'a> {
    fn project(post: &'a Post, shape: PostShape) -> Self {
        let mut item = PostItem {
            title: &post.title,
            description: &post.description,
            pub_date: post.pub_date,
            slug: &post.slug,
            body: None,
            category: Some(&post.category),
            category_id: None,
            reading_time: None,
        };
        match shape {
            PostShape::Reference => {}
            PostShape::WithBody => item.body = Some(&post.body),
            PostShape::ReadingTime => item.reading_time = Some(reading_time(&post.body)),
            PostShape::Flat => {
                item.category = None;
                item.category_id = Some(post.category.id());
            }
        }
        item
    }
}

/// Dates go out the way a browser's `Date#toJSON` writes them.
fn serialize_js_date<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format("%Y-%m-%dT%H:%M:%S%.3fZ"))
}

/// Estimated minutes to read `body`: whitespace-separated words / 200, rounded up.
///
/// No markup stripping and no CJK handling; an empty body reads in 0 minutes.
pub fn reading_time(body: &str) -> u32 {
    let words = body.split_whitespace().count();
    u32::try_from(words.div_ceil(WORDS_PER_MINUTE)).unwrap_or(u32::MAX)
}

/// `GET /categories.json`
pub fn categories(store: &ContentStore) -> Result<Endpoint, EndpointError> {
    let items: Vec<CategoryItem> = store
        .categories()
        .map(|c| CategoryItem {
            id: &c.id,
            name: &c.name,
        })
        .collect();
    Endpoint::json(CATEGORIES_ROUTE, &items)
}

/// `GET /posts.json`
pub fn posts(store: &ContentStore, shape: PostShape) -> Result<Endpoint, EndpointError> {
    let items: Vec<PostItem> = store
        .posts()
        .iter()
        .map(|p| PostItem::project(p, shape))
        .collect();
    Endpoint::json(POSTS_ROUTE, &items)
}

/// Render every endpoint the site publishes.
pub fn render_all(store: &ContentStore, config: &SiteConfig) -> Result<Vec<Endpoint>, EndpointError> {
    Ok(vec![categories(store)?, posts(store, config.api.posts)?])
}
