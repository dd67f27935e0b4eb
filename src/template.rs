//! Template rendering, delegated to MiniJinja.
//!
//! Templates are loaded lazily from the configured directory the first time
//! they are rendered. Files ending in `.html` are auto-escaped.

use std::path::PathBuf;
use std::sync::Arc;

use minijinja::Environment;
use serde::Serialize;

use crate::error::Error;

/// A handle to the template environment. Clones share it, so a handler can
/// capture one:
///
/// ```rust,no_run
/// use genuz::{App, Params, Request, Response, context};
///
/// let mut app = App::new();
/// let templates = app.templates();
/// app.route("/", move |_: &Request, resp: &mut Response, _: &Params| -> Result<(), genuz::Error> {
///     resp.set_html(templates.render("home.html", context! { new_title => "Home" })?);
///     Ok(())
/// }).unwrap();
/// ```
#[derive(Clone)]
pub struct Templates {
    env: Arc<Environment<'static>>,
}

impl Templates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(dir.into()));
        Self { env: Arc::new(env) }
    }

    /// Renders `name` with `context`.
    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String, Error> {
        let template = self.env.get_template(name)?;
        Ok(template.render(context)?)
    }
}
