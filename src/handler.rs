//! Handler traits, type erasure, and class-style resources.
//!
//! # How handlers are stored
//!
//! The router holds handlers of *different* types in one `Vec<Route>`, so each
//! one is erased to `Arc<dyn ErasedHandler>`:
//!
//! ```text
//! fn home(req: &Request, resp: &mut Response, params: &Params) { … }   ← user writes this
//!        ↓ app.route("/home", home)
//! home.into_boxed_handler()                        ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(home))                        ← stored as BoxedHandler
//!        ↓
//! handler.call(&req, &mut resp, &params)           ← one vtable dispatch per request
//! ```
//!
//! A [`Resource`] is the class-based flavour: one optional handler slot per
//! [`Method`]. The dispatcher picks the slot whose method matches the
//! request; an empty slot means `405 Method Not Allowed`.

use std::sync::Arc;

use crate::error::BoxError;
use crate::method::Method;
use crate::request::{Params, Request};
use crate::response::Response;

/// What a handler hands back to the dispatcher. `Err` goes to the registered
/// exception handler.
pub type HandlerResult = Result<(), BoxError>;

// ── Internal types ────────────────────────────────────────────────────────────

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: &Request, resp: &mut Response, params: &Params) -> HandlerResult;
}

/// A type-erased handler, shared by every request that reaches its route.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Return values ─────────────────────────────────────────────────────────────

/// Return types a handler may use: `()` for handlers that cannot fail, or
/// `Result<(), E>` for any error convertible into [`BoxError`].
pub trait IntoHandlerResult {
    fn into_handler_result(self) -> HandlerResult;
}

impl IntoHandlerResult for () {
    fn into_handler_result(self) -> HandlerResult { Ok(()) }
}

impl<E> IntoHandlerResult for Result<(), E>
where
    E: Into<BoxError>,
{
    fn into_handler_result(self) -> HandlerResult {
        self.map_err(Into::into)
    }
}

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid function handler.
///
/// You never implement this yourself. It is satisfied by any function or
/// closure with the signature:
///
/// ```text
/// fn name(req: &Request, resp: &mut Response, params: &Params) -> impl IntoHandlerResult
/// ```
///
/// The trait is sealed: only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, R> private::Sealed for F
where
    F: Fn(&Request, &mut Response, &Params) -> R + Send + Sync + 'static,
    R: IntoHandlerResult,
{
}

impl<F, R> Handler for F
where
    F: Fn(&Request, &mut Response, &Params) -> R + Send + Sync + 'static,
    R: IntoHandlerResult,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

struct FnHandler<F>(F);

impl<F, R> ErasedHandler for FnHandler<F>
where
    F: Fn(&Request, &mut Response, &Params) -> R,
    R: IntoHandlerResult,
{
    fn call(&self, req: &Request, resp: &mut Response, params: &Params) -> HandlerResult {
        (self.0)(req, resp, params).into_handler_result()
    }
}

// ── Resource ──────────────────────────────────────────────────────────────────

/// A class-style handler: one optional operation per HTTP method.
///
/// ```rust
/// use genuz::{Params, Request, Resource, Response};
///
/// fn list(_: &Request, resp: &mut Response, _: &Params) { resp.set_text("Books page") }
/// fn create(_: &Request, resp: &mut Response, _: &Params) { resp.set_text("created") }
///
/// let books = Resource::new().get(list).post(create);
/// assert_eq!(books.methods().count(), 2);
/// ```
#[derive(Clone)]
pub struct Resource {
    slots: [Option<BoxedHandler>; Method::COUNT],
}

impl Default for Resource {
    fn default() -> Self { Self::new() }
}

impl Resource {
    pub fn new() -> Self {
        Self { slots: std::array::from_fn(|_| None) }
    }

    /// Fills the slot for `method`, replacing whatever was there.
    pub fn on(mut self, method: Method, handler: impl Handler) -> Self {
        self.slots[method.index()] = Some(handler.into_boxed_handler());
        self
    }

    pub fn get(self, handler: impl Handler) -> Self { self.on(Method::Get, handler) }
    pub fn post(self, handler: impl Handler) -> Self { self.on(Method::Post, handler) }
    pub fn put(self, handler: impl Handler) -> Self { self.on(Method::Put, handler) }
    pub fn patch(self, handler: impl Handler) -> Self { self.on(Method::Patch, handler) }
    pub fn delete(self, handler: impl Handler) -> Self { self.on(Method::Delete, handler) }
    pub fn head(self, handler: impl Handler) -> Self { self.on(Method::Head, handler) }
    pub fn options(self, handler: impl Handler) -> Self { self.on(Method::Options, handler) }

    /// Methods with a populated slot, in [`Method::ALL`] order.
    pub fn methods(&self) -> impl Iterator<Item = Method> + '_ {
        Method::ALL.into_iter().filter(|m| self.slots[m.index()].is_some())
    }

    pub(crate) fn handler_for(&self, method: Method) -> Option<&BoxedHandler> {
        self.slots[method.index()].as_ref()
    }
}

// ── Endpoint ──────────────────────────────────────────────────────────────────

/// What a route points at.
#[derive(Clone)]
pub enum Endpoint {
    /// A single function serving every allowed method.
    Function(BoxedHandler),
    /// Per-method operations, selected by capability.
    Resource(Resource),
}

impl Endpoint {
    pub fn function(handler: impl Handler) -> Self {
        Self::Function(handler.into_boxed_handler())
    }

    /// Methods this endpoint can serve when no explicit allow-list is given.
    pub(crate) fn exposed_methods(&self) -> Vec<Method> {
        match self {
            Self::Function(_) => Method::ALL.to_vec(),
            Self::Resource(r) => r.methods().collect(),
        }
    }

    /// The concrete callable for `method`, or `None` when a resource has no
    /// operation for it.
    pub(crate) fn resolve(&self, method: Method) -> Option<&BoxedHandler> {
        match self {
            Self::Function(h) => Some(h),
            Self::Resource(r) => r.handler_for(method),
        }
    }
}

impl From<Resource> for Endpoint {
    fn from(r: Resource) -> Self { Self::Resource(r) }
}
