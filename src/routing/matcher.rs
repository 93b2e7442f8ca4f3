//! Path pattern matching module
//!
//! Patterns are slash-separated segments:
//! - `products` matches the literal segment
//! - `{id}` captures one percent-decoded segment into the route params under `id`
//! - `*` as the last segment matches any remainder, including nothing

use percent_encoding::percent_decode_str;
use serde_json::Value;

use crate::request::Inputs;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Wildcard,
}

/// Compiled route path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = split_segments(pattern)
            .map(|segment| {
                if segment == "*" {
                    Segment::Wildcard
                } else if let Some(name) = segment
                    .strip_prefix('{')
                    .and_then(|s| s.strip_suffix('}'))
                {
                    Segment::Param(name.to_string())
                } else {
                    Segment::Literal(segment.to_string())
                }
            })
            .collect();

        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a request path, returning the captured route params
    pub fn match_path(&self, path: &str) -> Option<Inputs> {
        let mut params = Inputs::new();
        let mut parts = split_segments(path);

        for segment in &self.segments {
            match segment {
                Segment::Wildcard => return Some(params),
                Segment::Literal(literal) => {
                    if parts.next()? != literal {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = parts.next()?;
                    params.insert(name.clone(), Value::String(decode_segment(value)));
                }
            }
        }

        // Every path segment must be consumed
        parts.next().is_none().then_some(params)
    }
}

/// Percent-decode a captured segment, keeping it raw if the result is not UTF-8
fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment)
        .decode_utf8()
        .map_or_else(|_| segment.to_string(), |decoded| decoded.into_owned())
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
