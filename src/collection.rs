//! The in-memory content store.
//!
//! [`ContentStore`] is built once per build from validated records and is
//! read-only afterwards. Construction is where collection-wide invariants are
//! enforced, since no single file can check them on its own:
//!
//! - category ids are unique
//! - post slugs are unique and non-empty
//! - with [`References::Checked`], every post's category exists; the post is
//!   then joined against it so its reference carries `{id, name}`
//!
//! Collisions are always errors. Neither record silently wins.

use crate::config::References;
use crate::types::{Category, CategoryEntry, CategoryRef, Post};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    #[error("duplicate category id `{id}` in {first} and {second}")]
    DuplicateCategory {
        id: String,
        first: String,
        second: String,
    },
    #[error("duplicate post slug `{slug}` in {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
    #[error("post {source_path} has an empty slug")]
    EmptySlug { source_path: String },
    #[error("post {source_path} references unknown category `{category}`")]
    UnknownCategory {
        source_path: String,
        category: String,
    },
}

/// Immutable snapshot of both collections, in load order.
#[derive(Debug, Clone)]
pub struct ContentStore {
    categories: Vec<CategoryEntry>,
    posts: Vec<Post>,
    category_index: HashMap<String, usize>,
    post_index: HashMap<String, usize>,
}

impl ContentStore {
    /// Build the store, checking uniqueness and joining post references.
    pub fn new(
        categories: Vec<CategoryEntry>,
        posts: Vec<Post>,
        references: References,
    ) -> Result<Self, CollectionError> {
        let mut category_index = HashMap::with_capacity(categories.len());
        for (i, entry) in categories.iter().enumerate() {
            if let Some(&prev) = category_index.get(&entry.category.id) {
                let prev: &CategoryEntry = &categories[prev];
                return Err(CollectionError::DuplicateCategory {
                    id: entry.category.id.clone(),
                    first: prev.source.clone(),
                    second: entry.source.clone(),
                });
            }
            category_index.insert(entry.category.id.clone(), i);
        }

        let mut post_index = HashMap::with_capacity(posts.len());
        for (i, post) in posts.iter().enumerate() {
            if post.slug.trim().is_empty() {
                return Err(CollectionError::EmptySlug {
                    source_path: post.source.clone(),
                });
            }
            if let Some(&prev) = post_index.get(&post.slug) {
                let prev: &Post = &posts[prev];
                return Err(CollectionError::DuplicateSlug {
                    slug: post.slug.clone(),
                    first: prev.source.clone(),
                    second: post.source.clone(),
                });
            }
            post_index.insert(post.slug.clone(), i);
        }

        let posts = match references {
            References::Checked => join_categories(posts, &categories, &category_index)?,
            References::Opaque => posts,
        };

        Ok(Self {
            categories,
            posts,
            category_index,
            post_index,
        })
    }

    /// Posts in load order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Categories in load order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().map(|e| &e.category)
    }

    /// Categories with the file each was loaded from.
    pub fn category_entries(&self) -> &[CategoryEntry] {
        &self.categories
    }

    pub fn post(&self, slug: &str) -> Option<&Post> {
        self.post_index.get(slug).map(|&i| &self.posts[i])
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.category_index
            .get(id)
            .map(|&i| &self.categories[i].category)
    }

    /// Posts whose category reference names `id`, in load order.
    pub fn posts_in_category<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Post> + 'a {
        self.posts.iter().filter(move |p| p.category.id() == id)
    }
}

/// Attach the resolved category to every post. Fails on the first dangling id.
///
/// References that already carry a name are resolved again by id, so the
/// published name always comes from the category file.
fn join_categories(
    posts: Vec<Post>,
    categories: &[CategoryEntry],
    index: &HashMap<String, usize>,
) -> Result<Vec<Post>, CollectionError> {
    posts
        .into_iter()
        .map(|mut post| {
            let Some(&i) = index.get(post.category.id()) else {
                return Err(CollectionError::UnknownCategory {
                    source_path: post.source.clone(),
                    category: post.category.id().to_string(),
                });
            };
            post.category = CategoryRef::Resolved(categories[i].category.clone());
            Ok(post)
        })
        .collect()
}
