//! The application: routes, middleware, exception handler, static files and
//! templates behind one entry point.
//!
//! Configure everything first, then serve. Registration takes `&mut self`, so
//! once the app is shared with the server (`Arc<App>`) nothing can change it.

use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::dispatch::dispatch;
use crate::error::{BoxError, Error};
use crate::exception::ExceptionHandler;
use crate::handler::{Endpoint, Handler, Resource};
use crate::method::Method;
use crate::middleware::{Middleware, MiddlewareStack};
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::static_files::StaticFiles;
use crate::template::Templates;
use crate::testing::TestClient;

pub struct App {
    config: Config,
    router: Router,
    middleware: MiddlewareStack,
    exceptions: ExceptionHandler,
    static_files: StaticFiles,
    templates: Templates,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Default for App {
    fn default() -> Self { Self::new() }
}

impl App {
    /// An app with [`Config::default`].
    pub fn new() -> Self {
        Self::build(Config::default())
    }

    /// An app with a custom configuration. Fails if the configuration does
    /// not pass [`Config::validate`].
    pub fn with_config(config: Config) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: Config) -> Self {
        Self {
            router: Router::new(),
            middleware: MiddlewareStack::default(),
            exceptions: ExceptionHandler::default(),
            static_files: StaticFiles::new(&config.static_prefix, config.static_dir.clone()),
            templates: Templates::new(config.templates_dir.clone()),
            config,
        }
    }

    pub fn config(&self) -> &Config { &self.config }
    pub fn router(&self) -> &Router { &self.router }

    // ── Registration ─────────────────────────────────────────────────────────

    /// Registers a function handler answering every method.
    ///
    /// ```rust
    /// use genuz::{App, Params, Request, Response};
    ///
    /// fn greeting(_: &Request, resp: &mut Response, params: &Params) {
    ///     resp.set_text(format!("Hello, {}", params.get("name").unwrap_or_default()));
    /// }
    ///
    /// let mut app = App::new();
    /// app.route("/hello/{name}", greeting).unwrap();
    /// assert_eq!(app.test_client().get("/hello/Bob").unwrap().text(), "Hello, Bob");
    /// ```
    pub fn route(&mut self, pattern: &str, handler: impl Handler) -> Result<&mut Self, Error> {
        self.add_route(pattern, Endpoint::function(handler), None)
    }

    /// Registers a function handler answering only `methods`.
    pub fn route_with(
        &mut self,
        pattern: &str,
        handler: impl Handler,
        methods: &[Method],
    ) -> Result<&mut Self, Error> {
        self.add_route(pattern, Endpoint::function(handler), Some(methods))
    }

    /// Registers a class-style resource; it answers the methods it has
    /// operations for.
    pub fn resource(&mut self, pattern: &str, resource: Resource) -> Result<&mut Self, Error> {
        self.add_route(pattern, resource.into(), None)
    }

    /// General form of the registration methods above. `allowed` of `None`
    /// means every method the endpoint exposes.
    pub fn add_route(
        &mut self,
        pattern: &str,
        endpoint: Endpoint,
        allowed: Option<&[Method]>,
    ) -> Result<&mut Self, Error> {
        self.router.add(pattern, endpoint, allowed)?;
        Ok(self)
    }

    /// Appends a middleware. The first one added is the outermost.
    pub fn add_middleware(&mut self, middleware: impl Middleware) -> &mut Self {
        self.middleware.push(middleware);
        debug!(layers = self.middleware.len(), "middleware added");
        self
    }

    /// Sets the callback for handler errors, replacing any previous one.
    pub fn add_exception_handler<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&Request, &mut Response, &BoxError) + Send + Sync + 'static,
    {
        self.exceptions.register(callback);
        self
    }

    // ── Templates ────────────────────────────────────────────────────────────

    /// A shareable handle to the template environment.
    pub fn templates(&self) -> Templates {
        self.templates.clone()
    }

    /// Renders a template from the configured directory.
    pub fn template<S: Serialize>(&self, name: &str, context: S) -> Result<String, Error> {
        self.templates.render(name, context)
    }

    // ── Serving ──────────────────────────────────────────────────────────────

    /// Handles one request.
    ///
    /// Static paths are answered directly. Everything else runs through the
    /// middleware stack and the dispatcher. `Err` means a handler failed and
    /// no exception handler was registered; the transport turns it into a 500.
    pub fn handle(&self, req: Request) -> Result<Response, Error> {
        if let Some(resp) = self.static_files.serve(req.path()) {
            return Ok(resp);
        }
        self.middleware
            .run(req, |req| dispatch(&self.router, &self.exceptions, req))
    }

    /// A synchronous client for exercising the app without a socket.
    pub fn test_client(&self) -> TestClient<'_> {
        TestClient::new(self)
    }
}
