//! Unified error type.

/// Error produced by a handler. Any `std::error::Error` converts into it with `?`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by genuz's fallible operations.
///
/// Routing misses are not errors: they become `404` / `405` [`Response`](crate::Response)
/// values. This type covers configuration mistakes caught at registration time,
/// infrastructure failures, and handler errors nobody recovered from.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address `{0}`")]
    InvalidAddress(String),

    #[error("invalid static prefix `{prefix}`: {reason}")]
    InvalidStaticPrefix { prefix: String, reason: &'static str },

    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: &'static str },

    #[error("route `{pattern}` is already registered")]
    DuplicateRoute { pattern: String },

    #[error("placeholder `{name}` appears more than once in `{pattern}`")]
    DuplicatePlaceholder { pattern: String, name: String },

    #[error("invalid uri: {0}")]
    InvalidUri(#[from] http::uri::InvalidUri),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("template: {0}")]
    Template(#[from] minijinja::Error),

    #[error("config: {0}")]
    Config(#[from] toml::de::Error),

    /// A handler failed and no exception handler was registered.
    #[error("unhandled handler error: {0}")]
    Handler(#[source] BoxError),
}

/// A handler panicked. Exception handlers receive it as a [`BoxError`] and
/// can tell it apart with `err.downcast_ref::<HandlerPanic>()`.
#[derive(Debug, thiserror::Error)]
#[error("handler panicked: {message}")]
pub struct HandlerPanic {
    pub message: String,
}

impl HandlerPanic {
    /// Extracts the message from a `catch_unwind` payload.
    pub(crate) fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(s) => *s,
            Err(payload) => match payload.downcast_ref::<&'static str>() {
                Some(s) => (*s).to_owned(),
                None => "non-string panic payload".to_owned(),
            },
        };
        Self { message }
    }
}
