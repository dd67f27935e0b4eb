//! Per-request tracing.

use std::time::Instant;

use tracing::info;

use super::Middleware;
use crate::request::Request;
use crate::response::Response;

#[derive(Clone, Copy)]
struct StartedAt(Instant);

/// Emits one `info` event per request with method, path, status and latency.
///
/// ```rust
/// use genuz::{App, middleware::Trace};
///
/// let mut app = App::new();
/// app.add_middleware(Trace);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl Middleware for Trace {
    fn process_request(&self, req: &mut Request) {
        req.extensions_mut().insert(StartedAt(Instant::now()));
    }

    fn process_response(&self, req: &Request, resp: &mut Response) {
        let latency_us = req
            .extensions()
            .get::<StartedAt>()
            .map(|s| s.0.elapsed().as_micros() as u64)
            .unwrap_or_default();

        info!(
            method = %req.method(),
            path = req.path(),
            status = resp.status(),
            latency_us,
            "request"
        );
    }
}
