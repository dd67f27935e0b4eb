//! Middleware layer.
//!
//! Middleware wraps dispatch with before/after hooks and is the right place
//! for cross-cutting concerns: tracing, request-id injection, response
//! headers. It can rewrite the request on the way in and the response on the
//! way out, but cannot skip the handler.
//!
//! The stack runs like nested decorators, with the first registered layer
//! outermost:
//!
//! ```text
//! A.process_request → B.process_request → dispatch → B.process_response → A.process_response
//! ```
//!
//! If dispatch fails with an unhandled handler error, no `process_response`
//! hook runs and the error propagates.

mod trace;

pub use trace::Trace;

use crate::error::Error;
use crate::request::Request;
use crate::response::Response;

/// A pair of hooks around dispatch. Both default to doing nothing.
pub trait Middleware: Send + Sync + 'static {
    /// Runs before the inner layers. May modify the request.
    fn process_request(&self, _req: &mut Request) {}

    /// Runs after the inner layers returned. May modify the response.
    fn process_response(&self, _req: &Request, _resp: &mut Response) {}
}

/// Ordered middleware, applied around one terminal dispatch call.
#[derive(Default)]
pub(crate) struct MiddlewareStack {
    layers: Vec<Box<dyn Middleware>>,
}

impl MiddlewareStack {
    pub(crate) fn push(&mut self, layer: impl Middleware) {
        self.layers.push(Box::new(layer));
    }

    pub(crate) fn len(&self) -> usize {
        self.layers.len()
    }

    pub(crate) fn run<F>(&self, mut req: Request, terminal: F) -> Result<Response, Error>
    where
        F: FnOnce(&Request) -> Result<Response, Error>,
    {
        for layer in &self.layers {
            layer.process_request(&mut req);
        }
        let mut resp = terminal(&req)?;
        for layer in self.layers.iter().rev() {
            layer.process_response(&req, &mut resp);
        }
        Ok(resp)
    }
}
