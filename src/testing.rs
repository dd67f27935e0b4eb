//! A synchronous test client.
//!
//! Drives [`App::handle`] directly, no socket involved. URLs may be absolute
//! (`http://testserver/home`, scheme and host are ignored) or just a path.

use crate::app::App;
use crate::error::Error;
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;

pub struct TestClient<'a> {
    app: &'a App,
}

impl<'a> TestClient<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    pub fn get(&self, url: &str) -> Result<Response, Error> {
        self.request(Method::Get, url, Vec::new())
    }

    pub fn post(&self, url: &str, body: impl Into<Vec<u8>>) -> Result<Response, Error> {
        self.request(Method::Post, url, body)
    }

    pub fn put(&self, url: &str, body: impl Into<Vec<u8>>) -> Result<Response, Error> {
        self.request(Method::Put, url, body)
    }

    pub fn patch(&self, url: &str, body: impl Into<Vec<u8>>) -> Result<Response, Error> {
        self.request(Method::Patch, url, body)
    }

    pub fn delete(&self, url: &str) -> Result<Response, Error> {
        self.request(Method::Delete, url, Vec::new())
    }

    pub fn request(&self, method: Method, url: &str, body: impl Into<Vec<u8>>) -> Result<Response, Error> {
        let uri: http::Uri = url.parse()?;
        let mut req = Request::new(method, uri.path()).with_body(body);
        if let Some(query) = uri.query() {
            req = req.with_query(query);
        }
        self.send(req)
    }

    /// Sends a fully built request, for when headers matter.
    pub fn send(&self, req: Request) -> Result<Response, Error> {
        self.app.handle(req)
    }
}
