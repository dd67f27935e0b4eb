//! The route table.
//!
//! Routes live in registration order and lookup is a linear scan: the first
//! route whose shape fits the path wins. No radix tree, no ranking. Patterns
//! are split on `/` into literal segments and `{name}` placeholders; a path
//! matches when it has the same number of segments and every literal is
//! equal.

use tracing::debug;

use crate::error::Error;
use crate::handler::Endpoint;
use crate::method::Method;
use crate::request::Params;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// One registered route. Immutable once added.
pub struct Route {
    pattern: String,
    segments: Vec<Segment>,
    endpoint: Endpoint,
    allowed: Vec<Method>,
}

impl Route {
    pub fn pattern(&self) -> &str { &self.pattern }
    pub fn endpoint(&self) -> &Endpoint { &self.endpoint }
    pub fn allowed_methods(&self) -> &[Method] { &self.allowed }

    fn capture(&self, parts: &[&str]) -> Option<Params> {
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = Params::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => params.insert(name.clone(), (*part).to_owned()),
            }
        }
        Some(params)
    }
}

/// Result of [`Router::lookup`].
pub enum Lookup<'a> {
    Found { route: &'a Route, params: Params },
    /// A route has the right shape but does not allow the method.
    MethodNotAllowed,
    NoMatch,
}

/// The application route table.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers `endpoint` under `pattern`.
    ///
    /// `allowed` restricts the methods the route answers; `None` means every
    /// method the endpoint exposes. Fails if the exact pattern is already
    /// registered (the existing route is kept), if a placeholder name repeats,
    /// or if the pattern is malformed.
    pub fn add(
        &mut self,
        pattern: &str,
        endpoint: Endpoint,
        allowed: Option<&[Method]>,
    ) -> Result<(), Error> {
        if self.routes.iter().any(|r| r.pattern == pattern) {
            return Err(Error::DuplicateRoute { pattern: pattern.to_owned() });
        }
        let segments = parse_pattern(pattern)?;
        let allowed = match allowed {
            Some(methods) => methods.to_vec(),
            None => endpoint.exposed_methods(),
        };

        debug!(pattern, ?allowed, "route registered");
        self.routes.push(Route { pattern: pattern.to_owned(), segments, endpoint, allowed });
        Ok(())
    }

    /// Finds the first route whose shape matches `path`.
    pub fn lookup(&self, path: &str, method: Method) -> Lookup<'_> {
        let parts = split_path(path);
        for route in &self.routes {
            let Some(params) = route.capture(&parts) else { continue };
            if !route.allowed.contains(&method) {
                return Lookup::MethodNotAllowed;
            }
            return Lookup::Found { route, params };
        }
        Lookup::NoMatch
    }

    /// Whether any route has the shape of `path`, regardless of method.
    pub fn matches_path(&self, path: &str) -> bool {
        let parts = split_path(path);
        self.routes.iter().any(|r| r.capture(&parts).is_some())
    }

    pub fn len(&self) -> usize { self.routes.len() }
    pub fn is_empty(&self) -> bool { self.routes.is_empty() }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.strip_prefix('/').unwrap_or(path).split('/').collect()
}

fn parse_pattern(pattern: &str) -> Result<Vec<Segment>, Error> {
    let invalid = |reason| Error::InvalidPattern { pattern: pattern.to_owned(), reason };

    if !pattern.starts_with('/') {
        return Err(invalid("must start with `/`"));
    }

    let mut segments = Vec::new();
    for part in split_path(pattern) {
        let segment = match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
            Some(name) => {
                if !is_identifier(name) {
                    return Err(invalid("placeholder name must be an identifier"));
                }
                if segments.contains(&Segment::Param(name.to_owned())) {
                    return Err(Error::DuplicatePlaceholder {
                        pattern: pattern.to_owned(),
                        name: name.to_owned(),
                    });
                }
                Segment::Param(name.to_owned())
            }
            None if part.contains(['{', '}']) => {
                return Err(invalid("braces are only allowed around a whole segment"));
            }
            None => Segment::Literal(part.to_owned()),
        };
        segments.push(segment);
    }
    Ok(segments)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Resource;
    use crate::request::Request;
    use crate::response::Response;

    fn noop(_: &Request, _: &mut Response, _: &Params) {}

    fn table(patterns: &[&str]) -> Router {
        let mut router = Router::new();
        for p in patterns {
            router.add(p, Endpoint::function(noop), None).unwrap();
        }
        router
    }

    #[test]
    fn literal_match() {
        let router = table(&["/home"]);
        assert!(matches!(router.lookup("/home", Method::Get), Lookup::Found { .. }));
        assert!(matches!(router.lookup("/about", Method::Get), Lookup::NoMatch));
    }

    #[test]
    fn placeholder_captures_segment() {
        let router = table(&["/hello/{name}"]);
        match router.lookup("/hello/Alice", Method::Get) {
            Lookup::Found { route, params } => {
                assert_eq!(route.pattern(), "/hello/{name}");
                assert_eq!(params.get("name"), Some("Alice"));
                assert_eq!(params.len(), 1);
            }
            _ => panic!("expected a match"),
        }
    }

    #[test]
    fn segment_count_must_match() {
        let router = table(&["/hello/{name}"]);
        assert!(matches!(router.lookup("/hello/Alice/extra", Method::Get), Lookup::NoMatch));
        assert!(matches!(router.lookup("/hello", Method::Get), Lookup::NoMatch));
    }

    #[test]
    fn trailing_slash_is_a_distinct_segment() {
        let router = table(&["/home"]);
        assert!(matches!(router.lookup("/home/", Method::Get), Lookup::NoMatch));
    }

    #[test]
    fn first_registered_wins() {
        let router = table(&["/books/{id}", "/books/new"]);
        match router.lookup("/books/new", Method::Get) {
            Lookup::Found { route, params } => {
                assert_eq!(route.pattern(), "/books/{id}");
                assert_eq!(params.get("id"), Some("new"));
            }
            _ => panic!("expected a match"),
        }
    }

    #[test]
    fn duplicate_pattern_is_rejected_and_first_route_kept() {
        let mut router = table(&["/home"]);
        let err = router.add("/home", Endpoint::from(Resource::new().post(noop)), None).unwrap_err();
        assert!(matches!(err, Error::DuplicateRoute { ref pattern } if pattern == "/home"));
        assert_eq!(router.len(), 1);
        // The first route still answers GET.
        assert!(matches!(router.lookup("/home", Method::Get), Lookup::Found { .. }));
    }

    #[test]
    fn repeated_placeholder_is_rejected() {
        let mut router = Router::new();
        let err = router.add("/a/{x}/{x}", Endpoint::function(noop), None).unwrap_err();
        assert!(matches!(err, Error::DuplicatePlaceholder { ref name, .. } if name == "x"));
        assert!(router.is_empty());
    }

    #[test]
    fn malformed_patterns_are_rejected() {
        let mut router = Router::new();
        for bad in ["home", "/a/{}", "/a/{1x}", "/a/pre{x}"] {
            let err = router.add(bad, Endpoint::function(noop), None).unwrap_err();
            assert!(matches!(err, Error::InvalidPattern { .. }), "{bad}");
        }
    }

    #[test]
    fn method_not_allowed_is_distinct_from_no_match() {
        let mut router = Router::new();
        router.add("/home", Endpoint::function(noop), Some(&[Method::Post][..])).unwrap();
        assert!(matches!(router.lookup("/home", Method::Get), Lookup::MethodNotAllowed));
        assert!(matches!(router.lookup("/home", Method::Post), Lookup::Found { .. }));
        assert!(matches!(router.lookup("/nope", Method::Get), Lookup::NoMatch));
    }

    #[test]
    fn resource_defaults_to_populated_slots() {
        let mut router = Router::new();
        router.add("/books", Resource::new().post(noop).into(), None).unwrap();
        let route = router.routes().next().unwrap();
        assert_eq!(route.allowed_methods(), &[Method::Post]);
    }

    #[test]
    fn path_match_ignores_method() {
        let mut router = Router::new();
        router.add("/home", Endpoint::function(noop), Some(&[Method::Post][..])).unwrap();
        router.add("/hello/{name}", Endpoint::function(noop), None).unwrap();
        assert!(router.matches_path("/home"));
        assert!(router.matches_path("/hello/Bob"));
        assert!(!router.matches_path("/hello/Bob/extra"));
        assert!(!router.matches_path("/nowhere"));
    }

    #[test]
    fn root_pattern() {
        let router = table(&["/"]);
        assert!(matches!(router.lookup("/", Method::Get), Lookup::Found { .. }));
        assert!(matches!(router.lookup("/x", Method::Get), Lookup::NoMatch));
    }
}
