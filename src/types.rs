//! Record types shared by every stage.
//!
//! These are the validated forms of content files. They are serialized into
//! the scan manifest and read back by the generate stage, so the JSON shape
//! must stay stable across both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A category from `content/categories/`.
///
/// The id is the data file name without its extension
/// (`categories/web-dev.json` → `web-dev`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// A post's link to its category.
///
/// Content files name a category by id. Once the store joins posts against
/// categories the reference carries the resolved record as well. Both forms
/// serialize to the shape exposed on `/posts.json`: `{id}` or `{id, name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Resolved(Category),
    Id { id: String },
}

impl CategoryRef {
    pub fn id(&self) -> &str {
        match self {
            CategoryRef::Resolved(category) => &category.id,
            CategoryRef::Id { id } => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            CategoryRef::Resolved(category) => Some(&category.name),
            CategoryRef::Id { .. } => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, CategoryRef::Resolved(_))
    }
}

/// A post from `content/posts/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub description: String,
    /// Publication date, from `date` or `pubDate` in the front-matter.
    pub pub_date: DateTime<Utc>,
    /// URL segment and lookup key. Unique within the collection.
    pub slug: String,
    /// Raw markdown after the front-matter block.
    pub body: String,
    pub category: CategoryRef,
    /// Source file relative to the content root, for diagnostics.
    pub source: String,
}

/// A category together with the file it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    #[serde(flatten)]
    pub category: Category,
    pub source: String,
}
