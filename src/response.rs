//! Outgoing HTTP response type.
//!
//! A handler receives a `&mut Response` already set to `200 OK` with an empty
//! body and fills it in. The body helpers each set the body *and* the
//! `content-type` header; when a handler calls more than one, the last call
//! wins for both.

use std::borrow::Cow;

use bytes::Bytes;
use http_body_util::Full;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::Error;
use crate::status::Status;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Content-type values the body helpers write.
pub enum ContentType {
    Html,         // text/html; charset=utf-8
    Json,         // application/json
    OctetStream,  // application/octet-stream
    Text,         // text/plain; charset=utf-8
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html        => "text/html; charset=utf-8",
            Self::Json        => "application/json",
            Self::OctetStream => "application/octet-stream",
            Self::Text        => "text/plain; charset=utf-8",
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// ```rust
/// use genuz::Response;
///
/// let mut resp = Response::new();
/// resp.set_text("Hello");
/// assert_eq!(resp.text(), "Hello");
/// assert_eq!(resp.header("Content-Type"), Some("text/plain; charset=utf-8"));
///
/// resp.set_json(&serde_json::json!({ "name": "Ezozbek" })).unwrap();
/// assert_eq!(resp.header("content-type"), Some("application/json"));
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    pub(crate) status: u16,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self { Self::new() }
}

impl Response {
    /// `200 OK`, no headers, empty body.
    pub fn new() -> Self {
        Self { status: Status::Ok.code(), headers: Vec::new(), body: Vec::new() }
    }

    /// Response with the given status and no body.
    pub fn with_status(code: impl Into<u16>) -> Self {
        Self { status: code.into(), headers: Vec::new(), body: Vec::new() }
    }

    /// `404` with body `"Not Found."`, the answer to a request no route matches.
    pub fn not_found() -> Self {
        Self::canned(Status::NotFound, "Not Found.")
    }

    /// `405` with body `"Method Not Allowed"`.
    pub fn method_not_allowed() -> Self {
        Self::canned(Status::MethodNotAllowed, "Method Not Allowed")
    }

    /// `500` with body `"Internal Server Error"`.
    pub fn internal_error() -> Self {
        Self::canned(Status::InternalServerError, "Internal Server Error")
    }

    fn canned(status: Status, body: &str) -> Self {
        let mut resp = Self::with_status(status);
        resp.set_text(body);
        resp
    }

    pub fn status(&self) -> u16 { self.status }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    pub fn set_status(&mut self, code: impl Into<u16>) {
        self.status = code.into();
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Sets a header, replacing any existing value under the same name
    /// (compared case-insensitively).
    pub fn set_header(&mut self, name: &str, value: &str) {
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some((_, v)) => *v = value.to_owned(),
            None => self.headers.push((name.to_owned(), value.to_owned())),
        }
    }

    /// Plain-text body, `text/plain; charset=utf-8`.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.set_typed(ContentType::Text.as_str(), text.into().into_bytes());
    }

    /// Serializes `value` as the JSON body, `application/json`.
    ///
    /// On a serialization error the response is left untouched.
    pub fn set_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        let body = serde_json::to_vec(value)?;
        self.set_typed(ContentType::Json.as_str(), body);
        Ok(())
    }

    /// HTML body, `text/html; charset=utf-8`. The usual sink for
    /// [`Templates::render`](crate::Templates::render).
    pub fn set_html(&mut self, html: impl Into<String>) {
        self.set_typed(ContentType::Html.as_str(), html.into().into_bytes());
    }

    /// Raw body. Content type defaults to `text/html; charset=utf-8`; use
    /// [`set_body_as`](Response::set_body_as) to pick another one.
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.set_typed(ContentType::Html.as_str(), body.into());
    }

    /// Raw body with an explicit content type.
    pub fn set_body_as(&mut self, content_type: &str, body: impl Into<Vec<u8>>) {
        self.set_typed(content_type, body.into());
    }

    fn set_typed(&mut self, content_type: &str, body: Vec<u8>) {
        self.set_header("content-type", content_type);
        self.body = body;
    }

    /// Body as UTF-8 text, with invalid sequences replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Converts into the transport representation.
    ///
    /// Headers hyper cannot represent are dropped with a warning; an out of
    /// range status becomes `500`.
    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let status = http::StatusCode::from_u16(self.status)
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

        let mut out = http::Response::new(Full::new(Bytes::from(self.body)));
        *out.status_mut() = status;

        let headers = out.headers_mut();
        for (name, value) in self.headers {
            let parsed = (
                http::HeaderName::from_bytes(name.as_bytes()),
                http::HeaderValue::from_str(&value),
            );
            match parsed {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "dropping invalid response header"),
            }
        }
        out
    }
}
