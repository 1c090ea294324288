//! Segment-based route pattern matching.
//!
//! Patterns are compiled once, when a route is registered, into a list of
//! segments:
//!
//! - literal segments match exactly (`events`)
//! - `:name` matches exactly one non-empty segment and captures it
//! - `*` matches any number of segments, including none
//!
//! Matching is anchored: every path segment has to be consumed. So
//! `/admin/users` does not match `/admin/users/extra`, while `/admin/*`
//! matches `/admin`, `/admin/` and `/admin/a/b`. Empty segments are ignored,
//! which makes a trailing slash insignificant.
//!
//! Query strings are not part of matching; callers strip them first (see
//! [`split_path_and_query`](crate::resolve::split_path_and_query)).

use crate::params::RouteParams;

/// One compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    /// Must equal the path segment
    Literal(String),
    /// Captures one path segment under the given name
    Param(String),
    /// Consumes zero or more path segments
    Wildcard,
}

/// A route pattern compiled for matching.
///
/// # Examples
///
/// ```
/// use club_navigator::matching::CompiledPattern;
///
/// let pattern = CompiledPattern::compile("/admin/user/:id");
/// assert!(pattern.is_match("/admin/user/42"));
/// assert!(!pattern.is_match("/admin/user/42/edit"));
///
/// let params = pattern.captures("/admin/user/42").unwrap();
/// assert_eq!(params.get("id"), Some(&"42".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    source: String,
    segments: Vec<PatternSegment>,
}

impl CompiledPattern {
    /// Compile a pattern. Never fails: a bare `:` is treated as a literal.
    pub fn compile(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .into_iter()
            .map(|segment| {
                if is_wildcard_segment(segment) {
                    PatternSegment::Wildcard
                } else if let Some(name) = extract_param_name(segment) {
                    PatternSegment::Param(name.to_string())
                } else {
                    PatternSegment::Literal(segment.to_string())
                }
            })
            .collect();

        Self {
            source: pattern.to_string(),
            segments,
        }
    }

    /// The pattern text this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Compiled segments.
    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    /// Check if the pattern contains a wildcard segment
    pub fn has_wildcard(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, PatternSegment::Wildcard))
    }

    /// Anchored match of `path` (without query string).
    pub fn is_match(&self, path: &str) -> bool {
        self.captures(path).is_some()
    }

    /// Match `path` and return the captured `:name` parameters.
    pub fn captures(&self, path: &str) -> Option<RouteParams> {
        let path_segments = split_path(path);
        let mut params = RouteParams::new();
        if match_segments(&self.segments, &path_segments, &mut params) {
            Some(params)
        } else {
            None
        }
    }
}

/// Backtracking matcher. `params` is only meaningful when this returns `true`.
fn match_segments(pattern: &[PatternSegment], path: &[&str], params: &mut RouteParams) -> bool {
    let Some((first, rest)) = pattern.split_first() else {
        return path.is_empty();
    };

    match first {
        PatternSegment::Wildcard => {
            // Trailing wildcard swallows whatever is left
            if rest.is_empty() {
                return true;
            }
            for skip in 0..=path.len() {
                let mut attempt = params.clone();
                if match_segments(rest, &path[skip..], &mut attempt) {
                    *params = attempt;
                    return true;
                }
            }
            false
        }
        PatternSegment::Param(name) => {
            let Some((segment, path_rest)) = path.split_first() else {
                return false;
            };
            params.set(name.clone(), (*segment).to_string());
            match_segments(rest, path_rest, params)
        }
        PatternSegment::Literal(literal) => match path.split_first() {
            Some((segment, path_rest)) if segment == literal => {
                match_segments(rest, path_rest, params)
            }
            _ => false,
        },
    }
}

/// Split a path into segments, filtering empty segments
///
/// # Examples
///
/// ```
/// use club_navigator::matching::split_path;
///
/// assert_eq!(split_path("/users/123"), vec!["users", "123"]);
/// assert!(split_path("/").is_empty());
/// assert_eq!(split_path("/users/"), vec!["users"]);
/// ```
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Extract parameter name from a route segment
///
/// Returns `None` for literals and for a bare `:`.
pub fn extract_param_name(segment: &str) -> Option<&str> {
    segment.strip_prefix(':').filter(|name| !name.is_empty())
}

/// Check if a route segment is a parameter
pub fn is_param_segment(segment: &str) -> bool {
    extract_param_name(segment).is_some()
}

/// Check if a route segment is a wildcard
pub fn is_wildcard_segment(segment: &str) -> bool {
    segment == "*"
}
