//! HTTP method as a typed enum.
//!
//! Covers the RFC 9110 standard methods. The set is closed on purpose: a
//! [`Resource`](crate::Resource) keeps one handler slot per variant, indexed by
//! [`Method::index`].
//!
//! Unknown method strings are rejected at the server level with
//! `405 Method Not Allowed` before they ever reach the application.

use std::fmt;
use std::str::FromStr;

/// A known HTTP method.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum Method {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl Method {
    /// Number of variants, i.e. the number of handler slots on a resource.
    pub const COUNT: usize = 9;

    /// Every method, in slot order.
    pub const ALL: [Method; Method::COUNT] = [
        Self::Connect,
        Self::Delete,
        Self::Get,
        Self::Head,
        Self::Options,
        Self::Patch,
        Self::Post,
        Self::Put,
        Self::Trace,
    ];

    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Delete  => "DELETE",
            Self::Get     => "GET",
            Self::Head    => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch   => "PATCH",
            Self::Post    => "POST",
            Self::Put     => "PUT",
            Self::Trace   => "TRACE",
        }
    }

    /// Lower-case operation name a class-style handler exposes for this
    /// method (`GET` -> `"get"`).
    pub fn operation(self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Delete  => "delete",
            Self::Get     => "get",
            Self::Head    => "head",
            Self::Options => "options",
            Self::Patch   => "patch",
            Self::Post    => "post",
            Self::Put     => "put",
            Self::Trace   => "trace",
        }
    }

    /// Position of this method in [`Method::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Parses a method name. The wire form is uppercase and case-sensitive per
/// RFC 9110 §9.1; the lower-case operation names (`"get"`, `"post"`, ...) are
/// accepted too so allow-lists can be written either way.
impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONNECT" | "connect" => Ok(Self::Connect),
            "DELETE"  | "delete"  => Ok(Self::Delete),
            "GET"     | "get"     => Ok(Self::Get),
            "HEAD"    | "head"    => Ok(Self::Head),
            "OPTIONS" | "options" => Ok(Self::Options),
            "PATCH"   | "patch"   => Ok(Self::Patch),
            "POST"    | "post"    => Ok(Self::Post),
            "PUT"     | "put"     => Ok(Self::Put),
            "TRACE"   | "trace"   => Ok(Self::Trace),
            _                     => Err(()),
        }
    }
}

impl TryFrom<&http::Method> for Method {
    type Error = ();

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_slot_order() {
        for (i, m) in Method::ALL.iter().enumerate() {
            assert_eq!(m.index(), i);
        }
    }

    #[test]
    fn parses_wire_and_operation_names() {
        assert_eq!("GET".parse::<Method>(), Ok(Method::Get));
        assert_eq!("post".parse::<Method>(), Ok(Method::Post));
        assert!("Get".parse::<Method>().is_err());
        assert!("PURGE".parse::<Method>().is_err());
    }

    #[test]
    fn converts_from_http_method() {
        assert_eq!(Method::try_from(&http::Method::DELETE), Ok(Method::Delete));
        let custom = http::Method::from_bytes(b"PURGE").unwrap();
        assert!(Method::try_from(&custom).is_err());
    }

    #[test]
    fn operation_is_lowercase_wire_name() {
        for m in Method::ALL {
            assert_eq!(m.operation(), m.as_str().to_ascii_lowercase());
        }
    }
}
