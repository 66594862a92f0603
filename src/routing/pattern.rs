//! Route path patterns.
//!
//! # Responsibilities
//! - Parse patterns such as `/accounts/{id}/entries/{*rest}`
//! - Reject malformed patterns before the routing engine sees them
//! - Detect patterns the routing engine cannot hold side by side, such as
//!   `/a/{id}` with `/a/{key}` or `/files/{id}` with `/files/{*rest}`
//!
//! # Design Decisions
//! - Syntax matches axum's router: `{name}` captures one segment, `{*name}` the remainder
//! - Literal segments are case-sensitive
//! - Catch-all only as the final segment

use std::fmt;

/// One segment of a parsed path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
    CatchAll(String),
}

/// A validated route path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

/// Why a pattern was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern '{0}' must start with '/'")]
    NotAbsolute(String),
    #[error("pattern '{pattern}' has an empty segment")]
    EmptySegment { pattern: String },
    #[error("pattern '{pattern}' has a malformed parameter segment '{segment}'")]
    MalformedParam { pattern: String, segment: String },
    #[error("pattern '{pattern}' repeats parameter '{name}'")]
    DuplicateParam { pattern: String, name: String },
    #[error("pattern '{pattern}' has a catch-all before the last segment")]
    CatchAllNotLast { pattern: String },
}

impl RoutePattern {
    /// Parse and validate a pattern.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if !raw.starts_with('/') {
            return Err(PatternError::NotAbsolute(raw.to_string()));
        }

        let mut segments = Vec::new();
        if raw != "/" {
            let parts: Vec<&str> = raw[1..].split('/').collect();
            let last = parts.len() - 1;
            for (i, part) in parts.iter().enumerate() {
                let segment = Self::parse_segment(raw, part)?;
                if matches!(segment, Segment::CatchAll(_)) && i != last {
                    return Err(PatternError::CatchAllNotLast { pattern: raw.to_string() });
                }
                segments.push(segment);
            }
        }

        let mut seen: Vec<&str> = Vec::new();
        for name in segments.iter().filter_map(|s| match s {
            Segment::Param(n) | Segment::CatchAll(n) => Some(n.as_str()),
            Segment::Literal(_) => None,
        }) {
            if seen.contains(&name) {
                return Err(PatternError::DuplicateParam {
                    pattern: raw.to_string(),
                    name: name.to_string(),
                });
            }
            seen.push(name);
        }

        Ok(Self { raw: raw.to_string(), segments })
    }

    fn parse_segment(raw: &str, part: &str) -> Result<Segment, PatternError> {
        if part.is_empty() {
            return Err(PatternError::EmptySegment { pattern: raw.to_string() });
        }

        let malformed = || PatternError::MalformedParam {
            pattern: raw.to_string(),
            segment: part.to_string(),
        };

        match part.strip_prefix('{') {
            Some(inner) => {
                let inner = inner.strip_suffix('}').ok_or_else(malformed)?;
                let (catch_all, name) = match inner.strip_prefix('*') {
                    Some(name) => (true, name),
                    None => (false, inner),
                };
                let valid = !name.is_empty()
                    && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
                if !valid {
                    return Err(malformed());
                }
                Ok(if catch_all {
                    Segment::CatchAll(name.to_string())
                } else {
                    Segment::Param(name.to_string())
                })
            }
            None if part.contains('{') || part.contains('}') => Err(malformed()),
            None => Ok(Segment::Literal(part.to_string())),
        }
    }

    /// The pattern as registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of all captured parameters, in path order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(n) | Segment::CatchAll(n) => Some(n.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Whether `self` and `other` capture at the same position under the same
    /// prefix in a way the routing engine rejects.
    ///
    /// Parameters at one position must share a name, and a parameter may not sit
    /// beside a catch-all. Literals beside captures are fine; the literal wins.
    pub fn conflicts_with(&self, other: &RoutePattern) -> bool {
        for (a, b) in self.segments.iter().zip(&other.segments) {
            match (a, b) {
                (Segment::Literal(x), Segment::Literal(y)) if x == y => continue,
                (Segment::Param(x), Segment::Param(y))
                | (Segment::CatchAll(x), Segment::CatchAll(y)) => {
                    if x != y {
                        return true;
                    }
                }
                (Segment::Param(_), Segment::CatchAll(_))
                | (Segment::CatchAll(_), Segment::Param(_)) => return true,
                _ => return false,
            }
        }
        false
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
