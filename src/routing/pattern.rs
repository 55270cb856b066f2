//! URL pattern translation and generation.
//!
//! Route files use `:name` for a single-segment parameter and `*name` for a
//! trailing catch-all, with an optional `?` suffix on parameters. Anything
//! else in a segment is a literal.
//!
//! # Design Decisions
//! - Matching is left to the dispatch engine; this module validates and
//!   rewrites pattern syntax and fills parameters in
//! - An optional parameter expands into two paths, with and without it
//! - Parameter values are percent-encoded; catch-all values keep their `/`

use thiserror::Error;

/// Error produced while generating a URL from a pattern.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("missing parameter `{0}` for url pattern")]
    MissingParam(String),
}

/// A pattern the dispatch engine cannot route.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("route pattern {0:?} must start with '/'")]
    MissingLeadingSlash(String),

    #[error("route pattern {0:?} has a parameter without a name")]
    EmptyParamName(String),

    #[error("catch-all in route pattern {0:?} must be the last segment")]
    CatchAllNotLast(String),
}

enum Segment<'a> {
    Literal(&'a str),
    Param { name: &'a str, optional: bool },
    CatchAll(&'a str),
}

fn classify(segment: &str) -> Segment<'_> {
    if let Some(name) = segment.strip_prefix(':') {
        match name.strip_suffix('?') {
            Some(name) => Segment::Param { name, optional: true },
            None => Segment::Param { name, optional: false },
        }
    } else if let Some(name) = segment.strip_prefix('*') {
        Segment::CatchAll(name)
    } else {
        Segment::Literal(segment)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Literal(String),
    Param(String),
    CatchAll(String),
}

/// One concrete path a pattern matches, with every optional parameter
/// either present or dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePath {
    segments: Vec<PathSegment>,
}

impl RoutePath {
    /// Render in axum's `{name}` / `{*name}` syntax.
    pub fn to_axum(&self) -> String {
        let rendered: Vec<String> = self
            .segments
            .iter()
            .map(|segment| match segment {
                PathSegment::Literal(literal) => literal.replace('{', "{{").replace('}', "}}"),
                PathSegment::Param(name) => format!("{{{name}}}"),
                PathSegment::CatchAll(name) => format!("{{*{name}}}"),
            })
            .collect();
        format!("/{}", rendered.join("/"))
    }

    /// Whether axum would refuse to hold both paths in one router.
    ///
    /// Paths sharing a prefix conflict when they first diverge on two
    /// different parameters. Diverging on a literal is fine, as is one path
    /// being a prefix of the other.
    pub fn conflicts_with(&self, other: &RoutePath) -> bool {
        for pair in self.segments.iter().zip(&other.segments) {
            match pair {
                (PathSegment::Literal(a), PathSegment::Literal(b)) if a == b => {}
                (PathSegment::Param(a), PathSegment::Param(b)) if a == b => {}
                (PathSegment::CatchAll(a), PathSegment::CatchAll(b)) => return a != b,
                (PathSegment::Literal(_), _) | (_, PathSegment::Literal(_)) => return false,
                _ => return true,
            }
        }
        false
    }
}

/// Validate `pattern` and expand it into the concrete paths it matches.
///
/// A pattern with `n` optional parameters expands into `2^n` paths, longest
/// first.
pub fn expand(pattern: &str) -> Result<Vec<RoutePath>, PatternError> {
    let Some(rest) = pattern.strip_prefix('/') else {
        return Err(PatternError::MissingLeadingSlash(pattern.to_string()));
    };

    let raw: Vec<&str> = rest.split('/').collect();
    let mut paths = vec![RoutePath { segments: Vec::new() }];

    for (index, segment) in raw.iter().enumerate() {
        let (segment, optional) = match classify(segment) {
            Segment::Literal(literal) => (PathSegment::Literal(literal.to_string()), false),
            Segment::Param { name, optional } => {
                if name.is_empty() {
                    return Err(PatternError::EmptyParamName(pattern.to_string()));
                }
                (PathSegment::Param(name.to_string()), optional)
            }
            Segment::CatchAll(name) => {
                if name.is_empty() {
                    return Err(PatternError::EmptyParamName(pattern.to_string()));
                }
                if index + 1 != raw.len() {
                    return Err(PatternError::CatchAllNotLast(pattern.to_string()));
                }
                (PathSegment::CatchAll(name.to_string()), false)
            }
        };

        if optional {
            let without = paths.clone();
            for path in &mut paths {
                path.segments.push(segment.clone());
            }
            paths.extend(without);
        } else {
            for path in &mut paths {
                path.segments.push(segment.clone());
            }
        }
    }

    Ok(paths)
}

/// Generate a URL by substituting `params` into `pattern`.
///
/// ```
/// use route_interceptors::routing::pattern::url;
///
/// let generated = url("/users/:id", &[("id", "1")]).unwrap();
/// assert_eq!(generated, "/users/1");
/// ```
pub fn url(pattern: &str, params: &[(&str, &str)]) -> Result<String, UrlError> {
    let lookup = |name: &str| params.iter().find(|(key, _)| *key == name).map(|(_, value)| *value);

    let mut segments = Vec::new();
    for segment in pattern.split('/') {
        match classify(segment) {
            Segment::Literal(literal) => segments.push(literal.to_string()),
            Segment::Param { name, optional } => match lookup(name) {
                Some(value) => segments.push(urlencoding::encode(value).into_owned()),
                None if optional => {}
                None => return Err(UrlError::MissingParam(name.to_string())),
            },
            Segment::CatchAll(name) => match lookup(name) {
                Some(value) => segments.push(
                    value
                        .split('/')
                        .map(|part| urlencoding::encode(part).into_owned())
                        .collect::<Vec<_>>()
                        .join("/"),
                ),
                None => return Err(UrlError::MissingParam(name.to_string())),
            },
        }
    }

    let url = segments.join("/");
    if url.is_empty() {
        Ok("/".to_string())
    } else {
        Ok(url)
    }
}
