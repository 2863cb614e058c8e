//! Content schema for the `posts` and `categories` collections.
//!
//! Each collection kind is a typed record ([`Post`], [`Category`]) with a
//! pure validation function that takes the raw front-matter of one file and
//! either builds the record or names the first field that is wrong.
//!
//! ## Posts
//!
//! | Field | Rule |
//! |-------|------|
//! | `title` | required string |
//! | `description` | required string |
//! | `date` / `pubDate` | required date (`date` wins when both are set) |
//! | `category` / `categoryId` | required id string, or a mapping with an `id` |
//! | `slug` | optional string; derived from the file path when absent |
//!
//! ## Categories
//!
//! | Field | Rule |
//! |-------|------|
//! | `name` | required string |
//!
//! The category id comes from the file name. Unknown keys are ignored in
//! both kinds. Whether a post's category actually exists is not checked
//! here; that needs the whole collection and happens in
//! [`crate::collection::ContentStore`].

use crate::naming;
use crate::types::{Category, CategoryRef, Post};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// What a field should have contained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    String,
    Date,
    Reference,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::String => f.write_str("a string"),
            Expected::Date => f.write_str("a date (YYYY-MM-DD or RFC 3339)"),
            Expected::Reference => f.write_str("a category id"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing required field `{field}`, expected {expected}")]
    Missing {
        field: &'static str,
        expected: Expected,
    },
    #[error("field `{field}` must be {expected}, found {found}")]
    WrongType {
        field: &'static str,
        expected: Expected,
        found: &'static str,
    },
    #[error("field `{field}` is not a valid date: {value:?}")]
    InvalidDate { field: &'static str, value: String },
    #[error("front-matter must be a mapping, found {found}")]
    NotAMapping { found: &'static str },
}

impl SchemaError {
    /// The offending field, if the error is about a single field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            SchemaError::Missing { field, .. }
            | SchemaError::WrongType { field, .. }
            | SchemaError::InvalidDate { field, .. } => Some(field),
            SchemaError::NotAMapping { .. } => None,
        }
    }
}

/// One content file as handed over by the loader, before validation.
#[derive(Debug, Clone)]
pub struct RawEntry {
    /// Path relative to the content root (`posts/hello.md`).
    pub source: String,
    /// Path relative to the collection directory (`hello.md`).
    pub collection_path: PathBuf,
    /// Parsed front-matter (posts) or file contents (data entries).
    pub data: Value,
    /// Text after the front-matter block. Empty for data entries.
    pub body: String,
}

/// Validate a post's front-matter and build the typed record.
pub fn validate_post(raw: &RawEntry) -> Result<Post, SchemaError> {
    let map = as_mapping(&raw.data)?;

    let title = require_string(map, "title")?;
    let description = require_string(map, "description")?;
    let pub_date = require_date(map, &["date", "pubDate"])?;
    let category = require_reference(map, &["category", "categoryId"])?;

    let slug = match lookup(map, &["slug"]) {
        Some((_, Value::String(s))) => s.trim().to_string(),
        Some((field, other)) => {
            return Err(SchemaError::WrongType {
                field,
                expected: Expected::String,
                found: type_name(other),
            });
        }
        None => naming::slug_from_path(&raw.collection_path),
    };

    Ok(Post {
        title,
        description,
        pub_date,
        slug,
        body: raw.body.clone(),
        category,
        source: raw.source.clone(),
    })
}

/// Validate a category data entry and build the typed record.
pub fn validate_category(raw: &RawEntry) -> Result<Category, SchemaError> {
    let map = as_mapping(&raw.data)?;
    let name = require_string(map, "name")?;
    Ok(Category {
        id: naming::entry_id(&raw.collection_path),
        name,
    })
}

/// Parse the date formats accepted in front-matter.
///
/// Values without an offset are taken as UTC; a bare date is midnight UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn as_mapping(value: &Value) -> Result<&Mapping, SchemaError> {
    value.as_mapping().ok_or(SchemaError::NotAMapping {
        found: type_name(value),
    })
}

/// First present, non-null key among `fields`, with the name it was found under.
fn lookup<'a>(map: &'a Mapping, fields: &[&'static str]) -> Option<(&'static str, &'a Value)> {
    fields.iter().find_map(|&field| {
        map.get(field)
            .filter(|v| !v.is_null())
            .map(|v| (field, v))
    })
}

fn require_string(map: &Mapping, field: &'static str) -> Result<String, SchemaError> {
    match lookup(map, &[field]) {
        Some((_, Value::String(s))) => Ok(s.clone()),
        Some((field, other)) => Err(SchemaError::WrongType {
            field,
            expected: Expected::String,
            found: type_name(other),
        }),
        None => Err(SchemaError::Missing {
            field,
            expected: Expected::String,
        }),
    }
}

fn require_date(map: &Mapping, fields: &[&'static str]) -> Result<DateTime<Utc>, SchemaError> {
    match lookup(map, fields) {
        Some((field, Value::String(s))) => parse_date(s).ok_or_else(|| SchemaError::InvalidDate {
            field,
            value: s.clone(),
        }),
        Some((field, other)) => Err(SchemaError::WrongType {
            field,
            expected: Expected::Date,
            found: type_name(other),
        }),
        None => Err(SchemaError::Missing {
            field: fields[0],
            expected: Expected::Date,
        }),
    }
}

fn require_reference(map: &Mapping, fields: &[&'static str]) -> Result<CategoryRef, SchemaError> {
    let (field, value) = lookup(map, fields).ok_or(SchemaError::Missing {
        field: fields[0],
        expected: Expected::Reference,
    })?;
    let wrong_type = |found| SchemaError::WrongType {
        field,
        expected: Expected::Reference,
        found,
    };

    match value {
        Value::String(id) => Ok(CategoryRef::Id { id: id.clone() }),
        Value::Mapping(inner) => {
            let id = match inner.get("id") {
                Some(Value::String(id)) => id.clone(),
                Some(other) => return Err(wrong_type(type_name(other))),
                None => return Err(wrong_type("a mapping without `id`")),
            };
            match inner.get("name") {
                Some(Value::String(name)) => Ok(CategoryRef::Resolved(Category {
                    id,
                    name: name.clone(),
                })),
                None | Some(Value::Null) => Ok(CategoryRef::Id { id }),
                Some(other) => Err(SchemaError::WrongType {
                    field,
                    expected: Expected::String,
                    found: type_name(other),
                }),
            }
        }
        other => Err(wrong_type(type_name(other))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
