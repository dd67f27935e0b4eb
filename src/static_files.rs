//! Static files under a reserved URL prefix.
//!
//! Requests under the prefix never reach the router or the middleware stack.
//! The rest of the path is looked up below the configured directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::response::Response;
use crate::status::Status;

pub(crate) struct StaticFiles {
    prefix: String,
    root: PathBuf,
}

impl StaticFiles {
    pub(crate) fn new(prefix: &str, root: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.trim_end_matches('/').to_owned(),
            root: root.into(),
        }
    }

    /// `None` if `path` is not under the prefix; otherwise the file or an
    /// error status.
    pub(crate) fn serve(&self, path: &str) -> Option<Response> {
        let rest = path.strip_prefix(&self.prefix)?.strip_prefix('/')?;

        let Some(relative) = sanitize(rest) else {
            debug!(path, "rejected static path");
            return Some(Response::with_status(Status::NotFound));
        };
        let full = self.root.join(relative);

        let body = match std::fs::read(&full) {
            Ok(body) => body,
            Err(err) => {
                return Some(match err.kind() {
                    ErrorKind::NotFound | ErrorKind::IsADirectory => {
                        Response::with_status(Status::NotFound)
                    }
                    ErrorKind::PermissionDenied => Response::with_status(Status::Forbidden),
                    // Reading a directory surfaces as a generic error on some platforms.
                    _ if full.is_dir() => Response::with_status(Status::NotFound),
                    _ => {
                        error!(file = %full.display(), "static file read failed: {err}");
                        Response::with_status(Status::InternalServerError)
                    }
                });
            }
        };

        debug!(file = %full.display(), bytes = body.len(), "serving static file");
        let mut resp = Response::new();
        resp.set_body_as(guess_mime(&full), body);
        Some(resp)
    }
}

/// Keeps only plain path segments; `..`, `.` and empty segments are refused.
fn sanitize(rest: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for segment in rest.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
            return None;
        }
        out.push(segment);
    }
    Some(out)
}

fn guess_mime(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("htm") | Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("txt") => "text/plain; charset=utf-8",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> StaticFiles {
        StaticFiles::new("/static", concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/static"))
    }

    #[test]
    fn outside_prefix_is_not_static() {
        let files = fixtures();
        assert!(files.serve("/home").is_none());
        assert!(files.serve("/staticky/test.css").is_none());
        assert!(files.serve("/static").is_none());
    }

    #[test]
    fn serves_existing_file() {
        let resp = fixtures().serve("/static/test.css").unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text(), "body {background-color: chocolate;}");
        assert_eq!(resp.header("content-type"), Some("text/css"));
    }

    #[test]
    fn missing_file_is_404() {
        let resp = fixtures().serve("/static/missing.css").unwrap();
        assert_eq!(resp.status(), 404);
        assert!(resp.body().is_empty());
    }

    #[test]
    fn traversal_is_refused() {
        let files = fixtures();
        for path in ["/static/../Cargo.toml", "/static/./test.css", "/static//test.css", "/static/"] {
            assert_eq!(files.serve(path).unwrap().status(), 404, "{path}");
        }
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(guess_mime(Path::new("a/b.png")), "image/png");
        assert_eq!(guess_mime(Path::new("noext")), "application/octet-stream");
    }
}
