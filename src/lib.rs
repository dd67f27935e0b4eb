//! # genuz
//!
//! A small synchronous web micro-framework. Routes, class-style resources,
//! middleware, one exception handler, templates and static files on top of
//! hyper.
//!
//! ## What happens to a request
//!
//! ```text
//! /static/...  → file from the static directory (404 if absent)
//! otherwise    → middleware pre-hooks → route lookup → method check
//!              → handler (errors go to the exception handler)
//!              → middleware post-hooks (reverse order)
//! ```
//!
//! Routing is a first-match scan over the registered patterns. A pattern is
//! literal segments plus `{name}` placeholders; nothing fancier.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use genuz::{App, BoxError, Params, Request, Resource, Response, Server};
//!
//! fn greeting(_req: &Request, resp: &mut Response, params: &Params) {
//!     resp.set_text(format!("Hello, {}", params.get("name").unwrap_or("stranger")));
//! }
//!
//! fn list_books(_req: &Request, resp: &mut Response, _: &Params) -> Result<(), BoxError> {
//!     resp.set_json(&["Dune", "Solaris"])?;
//!     Ok(())
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), genuz::Error> {
//!     let mut app = App::new();
//!     app.route("/hello/{name}", greeting)?
//!        .resource("/books", Resource::new().get(list_books))?;
//!
//!     Server::from_config(&app)?.serve(app).await
//! }
//! ```

mod app;
mod config;
mod dispatch;
mod error;
mod exception;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod static_files;
mod status;
mod template;
mod testing;

pub mod middleware;

pub use app::App;
pub use config::Config;
pub use error::{BoxError, Error, HandlerPanic};
pub use exception::ExceptionCallback;
pub use handler::{Endpoint, Handler, HandlerResult, IntoHandlerResult, Resource};
pub use method::Method;
pub use minijinja::context;
pub use request::{Params, Request};
pub use response::{ContentType, Response};
pub use router::{Lookup, Route, Router};
pub use server::Server;
pub use status::Status;
pub use template::Templates;
pub use testing::TestClient;
