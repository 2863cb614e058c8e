//! Front-matter extraction for markdown content files.
//!
//! A post starts with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Hello
//! date: 2024-01-15
//! category: rust
//! ---
//! Body text...
//! ```
//!
//! Files without an opening fence are all body. An opening fence that is
//! never closed is an error rather than silently treating the whole file
//! as metadata.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

const FENCE: &str = "---";

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("front-matter block is never closed with `---`")]
    Unclosed,
    #[error("invalid YAML in front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Split a file into its raw front-matter block and the body that follows.
pub fn split(content: &str) -> Result<(Option<&str>, &str), FrontMatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some(after_open) = strip_fence_line(content) else {
        return Ok((None, content));
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == FENCE {
            let block = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return Ok((Some(block), body));
        }
        offset += line.len();
    }
    Err(FrontMatterError::Unclosed)
}

/// Returns the text after an opening `---` line, if the content starts with one.
fn strip_fence_line(content: &str) -> Option<&str> {
    let rest = content.strip_prefix(FENCE)?;
    if let Some(rest) = rest.strip_prefix("\r\n") {
        Some(rest)
    } else {
        rest.strip_prefix('\n')
    }
}

/// Parse a content file into its front-matter value and body.
///
/// A missing or empty block yields an empty mapping, so schema validation
/// reports the first missing field instead of a parse error.
pub fn parse(content: &str) -> Result<(Value, String), FrontMatterError> {
    let (block, body) = split(content)?;
    let value = match block {
        Some(block) if !block.trim().is_empty() => serde_yaml::from_str(block)?,
        _ => Value::Mapping(Mapping::new()),
    };
    Ok((value, body.to_string()))
}
