//! Route lookup, method checks, and the handler failure boundary.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::error::{BoxError, Error, HandlerPanic};
use crate::exception::ExceptionHandler;
use crate::request::Request;
use crate::response::Response;
use crate::router::{Lookup, Router};

/// Produces the response for one request.
///
/// Routing misses never run user code: no match is `404 "Not Found."`, a
/// disallowed method or a resource without an operation for the method is
/// `405 "Method Not Allowed"`. A handler error or panic goes to the exception
/// handler exactly once; with none registered it comes back as
/// [`Error::Handler`]. A panic arrives there as a [`HandlerPanic`].
pub(crate) fn dispatch(
    router: &Router,
    exceptions: &ExceptionHandler,
    req: &Request,
) -> Result<Response, Error> {
    let (route, params) = match router.lookup(req.path(), req.method()) {
        Lookup::Found { route, params } => (route, params),
        Lookup::MethodNotAllowed => {
            debug!(method = %req.method(), path = req.path(), "method not allowed");
            return Ok(Response::method_not_allowed());
        }
        Lookup::NoMatch => {
            debug!(method = %req.method(), path = req.path(), "no route");
            return Ok(Response::not_found());
        }
    };

    let Some(handler) = route.endpoint().resolve(req.method()) else {
        debug!(
            pattern = route.pattern(),
            operation = req.method().operation(),
            "resource has no operation for method"
        );
        return Ok(Response::method_not_allowed());
    };

    let mut response = Response::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.call(req, &mut response, &params)))
        .unwrap_or_else(|payload| Err(BoxError::from(HandlerPanic::from_payload(payload))));

    if let Err(err) = outcome {
        if !exceptions.is_registered() {
            warn!(pattern = route.pattern(), error = %err, "unhandled handler error");
        }
        exceptions
            .invoke(req, &mut response, err)
            .map_err(Error::Handler)?;
    }
    Ok(response)
}
