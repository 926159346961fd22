#![forbid(unsafe_code)]

use std::collections::HashSet;
use std::fmt;

use log::debug;
use crate::utils::errors::Errors;

// ***************************************************************************
//                               Route Types
// ***************************************************************************
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {Get, Post}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/** One registered route.  Templates use the router's syntax: literal
 * segments and `:name` captures, e.g. `/api/user/:username`.
 */
#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    pub method: HttpMethod,
    pub template: &'static str,
}

impl RouteSpec {
    pub const fn get(template: &'static str) -> Self {
        Self { method: HttpMethod::Get, template }
    }

    pub const fn post(template: &'static str) -> Self {
        Self { method: HttpMethod::Post, template }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Capture(&'a str),
}

// ***************************************************************************
//                             Public Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// parse_template:
// ---------------------------------------------------------------------------
/** Split a template into segments.  The root template "/" has no segments.
 * Empty segments, empty or malformed capture names and repeated capture
 * names are rejected.
 */
pub fn parse_template(template: &str) -> Result<Vec<Segment<'_>>, Errors> {
    let invalid = |msg: &str| Errors::InvalidRouteTemplate(template.to_string(), msg.to_string());

    let rest = match template.strip_prefix('/') {
        Some(r) => r,
        None => return Err(invalid("must start with '/'")),
    };
    if rest.is_empty() {
        return Ok(vec![]);
    }

    let mut segments = Vec::new();
    let mut captures = HashSet::new();
    for part in rest.split('/') {
        if part.is_empty() {
            return Err(invalid("empty path segment"));
        }
        match part.strip_prefix(':') {
            Some(name) => {
                if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    return Err(invalid("capture names must be non-empty and alphanumeric"));
                }
                if !captures.insert(name) {
                    return Err(invalid("repeated capture name"));
                }
                segments.push(Segment::Capture(name));
            }
            None => segments.push(Segment::Literal(part)),
        }
    }
    Ok(segments)
}

// ---------------------------------------------------------------------------
// validate_route_table:
// ---------------------------------------------------------------------------
/** Reject the table if any template is malformed or if two routes with the
 * same method could both match some request path.
 */
pub fn validate_route_table(table: &[RouteSpec]) -> Result<(), Errors> {
    let mut parsed = Vec::with_capacity(table.len());
    for route in table {
        parsed.push((route, parse_template(route.template)?));
    }

    for (i, (a, a_segs)) in parsed.iter().enumerate() {
        for (b, b_segs) in parsed.iter().skip(i + 1) {
            if a.method == b.method && overlaps(a_segs, b_segs) {
                return Err(Errors::AmbiguousRoutes(a.method.to_string(),
                                                   a.template.to_string(),
                                                   b.template.to_string()));
            }
        }
    }

    debug!("Route table validated, {} routes.", table.len());
    Ok(())
}

// ***************************************************************************
//                            Private Functions
// ***************************************************************************
// Two templates overlap when they have the same length and no position holds
// two different literals.
fn overlaps(a: &[Segment<'_>], b: &[Segment<'_>]) -> bool {
    a.len() == b.len() &&
    a.iter().zip(b).all(|pair| match pair {
        (Segment::Literal(x), Segment::Literal(y)) => x == y,
        _ => true,
    })
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_root() {
        assert_eq!(parse_template("/").unwrap(), vec![]);
    }

    #[test]
    fn parse_literals_and_captures() {
        assert_eq!(parse_template("/api/user/:username").unwrap(),
                   vec![Segment::Literal("api"), Segment::Literal("user"), Segment::Capture("username")]);
    }

    #[test]
    fn parse_rejects_malformed() {
        for t in ["", "api/user", "/api//user", "/api/user/", "/api/:", "/api/:a-b", "/:id/:id"] {
            assert!(parse_template(t).is_err(), "accepted {:?}", t);
        }
    }

    #[test]
    fn distinct_literals_are_not_ambiguous() {
        let table = [
            RouteSpec::get("/api/user/:username"),
            RouteSpec::get("/api/getuser/:username"),
            RouteSpec::post("/api/user"),
            RouteSpec::get("/"),
        ];
        assert!(validate_route_table(&table).is_ok());
    }

    #[test]
    fn same_path_different_method_is_fine() {
        let table = [RouteSpec::get("/api/user"), RouteSpec::post("/api/user")];
        assert!(validate_route_table(&table).is_ok());
    }

    #[test]
    fn duplicate_route_is_ambiguous() {
        let table = [RouteSpec::get("/api/finacle"), RouteSpec::get("/api/finacle")];
        assert!(matches!(validate_route_table(&table), Err(Errors::AmbiguousRoutes(..))));
    }

    #[test]
    fn capture_shadowing_literal_is_ambiguous() {
        let table = [RouteSpec::get("/api/user/:username"), RouteSpec::get("/api/user/me")];
        assert!(matches!(validate_route_table(&table), Err(Errors::AmbiguousRoutes(..))));

        let table = [RouteSpec::get("/api/:section/list"), RouteSpec::get("/api/user/:id")];
        assert!(matches!(validate_route_table(&table), Err(Errors::AmbiguousRoutes(..))));
    }

    #[test]
    fn malformed_template_fails_validation() {
        let table = [RouteSpec::get("/api/user/")];
        assert!(matches!(validate_route_table(&table), Err(Errors::InvalidRouteTemplate(..))));
    }
}
