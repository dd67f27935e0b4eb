//! The exception-handler slot.
//!
//! At most one callback per application. Registering a new one drops the old
//! one. Configure it before serving; it is only read afterwards.

use crate::error::BoxError;
use crate::request::Request;
use crate::response::Response;

/// A registered exception callback. It receives the response the failing
/// handler was writing and is expected to finish it.
pub type ExceptionCallback = Box<dyn Fn(&Request, &mut Response, &BoxError) + Send + Sync + 'static>;

#[derive(Default)]
pub(crate) struct ExceptionHandler {
    callback: Option<ExceptionCallback>,
}

impl ExceptionHandler {
    pub(crate) fn register<F>(&mut self, callback: F)
    where
        F: Fn(&Request, &mut Response, &BoxError) + Send + Sync + 'static,
    {
        self.callback = Some(Box::new(callback));
    }

    pub(crate) fn is_registered(&self) -> bool {
        self.callback.is_some()
    }

    /// Lets the callback populate `resp`. Without one, hands `err` back so the
    /// caller can propagate it.
    pub(crate) fn invoke(&self, req: &Request, resp: &mut Response, err: BoxError) -> Result<(), BoxError> {
        match &self.callback {
            Some(callback) => {
                callback(req, resp, &err);
                Ok(())
            }
            None => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    #[test]
    fn unregistered_hands_error_back() {
        let slot = ExceptionHandler::default();
        let req = Request::new(Method::Get, "/");
        let mut resp = Response::new();
        let err = slot.invoke(&req, &mut resp, "boom".into()).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(!slot.is_registered());
    }

    #[test]
    fn last_registered_wins() {
        let mut slot = ExceptionHandler::default();
        slot.register(|_: &Request, resp: &mut Response, _: &BoxError| resp.set_text("first"));
        slot.register(|_: &Request, resp: &mut Response, err: &BoxError| resp.set_text(format!("second: {err}")));

        let req = Request::new(Method::Get, "/");
        let mut resp = Response::new();
        slot.invoke(&req, &mut resp, "boom".into()).unwrap();
        assert_eq!(resp.text(), "second: boom");
    }
}
