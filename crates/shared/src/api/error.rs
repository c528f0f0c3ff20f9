use std::{error::Error, fmt};

use http::StatusCode;
use serde::{Deserialize, Serialize};

#[cfg(feature = "backend")]
pub use backend::*;

/// Text sent to clients for any failure that isn't their fault. The details
/// only go to the server log
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error type for routes that don't have any errors of their own
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Nothing {}

impl fmt::Display for Nothing {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl Error for Nothing {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub error_messages: Vec<String>,
}

impl ValidationError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            error_messages: vec![message.into()],
        }
    }

    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.error_messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.error_messages.is_empty()
    }

    /// Turns the collected messages into an error if there are any
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error_messages.join("; "))
    }
}

impl Error for ValidationError {}

/// Body of every error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ServerError<T> {
    /// Route specific error with its own status code
    Inner { code: StatusCode, inner: T },
    /// Request values that parsed but didn't make sense
    Validation { inner: ValidationError },
    /// The request couldn't be extracted at all (bad json, wrong content type)
    Rejection { code: StatusCode, message: String },
    Database { message: String },
    Pool { message: String },
    Other { message: String },

    WithContext { context: String, inner: Box<Self> },
}

impl<T> ServerError<T> {
    pub fn code(&self) -> StatusCode {
        use ServerError::*;
        match self {
            Inner { code, .. } | Rejection { code, .. } => *code,
            Validation { .. } => StatusCode::BAD_REQUEST,
            Database { .. } | Pool { .. } | Other { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            WithContext { inner, .. } => inner.code(),
        }
    }

    pub fn context<S: Into<String>>(self, context: S) -> Self {
        Self::WithContext {
            context: context.into(),
            inner: Box::new(self),
        }
    }
}

impl<T: fmt::Display> ServerError<T> {
    /// Message that is safe to hand back to the client
    pub fn public_message(&self) -> String {
        use ServerError::*;
        match self {
            Inner { inner, .. } => inner.to_string(),
            Validation { inner } => inner.to_string(),
            Rejection { message, .. } => message.clone(),
            Database { .. } | Pool { .. } | Other { .. } => INTERNAL_ERROR_MESSAGE.to_string(),
            WithContext { inner, .. } => inner.public_message(),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.public_message(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for ServerError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ServerError::*;
        match self {
            Inner { code, inner } => write!(f, "{code}: {inner}"),
            Validation { inner } => write!(f, "Validation failed: {inner}"),
            Rejection { code, message } => write!(f, "Rejected ({code}): {message}"),
            Database { message } => write!(f, "Database error: {message}"),
            Pool { message } => write!(f, "Connection pool error: {message}"),
            Other { message } => write!(f, "{message}"),
            WithContext { context, inner } => write!(f, "{context}: {inner}"),
        }
    }
}

impl<T: fmt::Debug + fmt::Display> Error for ServerError<T> {}

impl<T> From<ValidationError> for ServerError<T> {
    fn from(inner: ValidationError) -> Self {
        Self::Validation { inner }
    }
}

pub trait ServerErrorContext<V, T> {
    /// Wrap the error with a description of what was being attempted
    fn context<S: Into<String>>(self, context: S) -> Result<V, ServerError<T>>;

    /// Wrap the error with a description of what was being attempted
    ///
    /// `context` is provided as a closure to avoid potential formatting cost if
    /// the result isn't an error
    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, context: F)
        -> Result<V, ServerError<T>>;
}

impl<V, T, E: Into<ServerError<T>>> ServerErrorContext<V, T> for Result<V, E> {
    fn context<S: Into<String>>(self, context: S) -> Result<V, ServerError<T>> {
        self.map_err(|e| e.into().context(context))
    }

    fn with_context<S: Into<String>, F: FnOnce() -> S>(
        self,
        context: F,
    ) -> Result<V, ServerError<T>> {
        self.map_err(|e| e.into().context(context()))
    }
}

/// Builds a [`ServerError::Other`] from format args
#[macro_export]
macro_rules! other_error {
    ($($arg:tt)*) => {
        $crate::api::error::ServerError::Other { message: format!($($arg)*) }
    };
}

#[cfg(feature = "backend")]
mod backend {
    use std::fmt;

    use axum::{
        extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
        response::{IntoResponse, Response},
        Json,
    };
    use deadpool_sqlite::{HookError, InteractError, PoolError};
    use tracing::{error, warn};

    use super::ServerError;

    impl<T> From<rusqlite::Error> for ServerError<T> {
        fn from(err: rusqlite::Error) -> Self {
            Self::Database {
                message: err.to_string(),
            }
        }
    }

    impl<T> From<InteractError> for ServerError<T> {
        fn from(err: InteractError) -> Self {
            Self::Pool {
                message: format!("interact: {err:?}"),
            }
        }
    }

    impl<T> From<PoolError> for ServerError<T> {
        fn from(err: PoolError) -> Self {
            Self::Pool {
                message: err.to_string(),
            }
        }
    }

    impl<T: fmt::Display> From<ServerError<T>> for HookError {
        fn from(err: ServerError<T>) -> Self {
            Self::Message(err.to_string())
        }
    }

    macro_rules! rejection {
        ($($rejection:ty),* $(,)?) => {
            $(
                impl<T> From<$rejection> for ServerError<T> {
                    fn from(rejection: $rejection) -> Self {
                        Self::Rejection {
                            code: rejection.status(),
                            message: rejection.body_text(),
                        }
                    }
                }
            )*
        };
    }

    rejection!(JsonRejection, FormRejection, QueryRejection, PathRejection);

    // Render ServerError into a json response, logging anything that is the
    // server's fault
    impl<T: fmt::Debug + fmt::Display> IntoResponse for ServerError<T> {
        fn into_response(self) -> Response {
            let code = self.code();
            if code.is_server_error() {
                error!(%code, error = %self, "Request failed");
            } else {
                warn!(%code, error = %self, "Request rejected");
            }

            (code, Json(self.to_response())).into_response()
        }
    }
}

#[cfg(test)]
mod test {
    use http::StatusCode;

    use super::*;

    #[test]
    fn test_backend_failures_hide_details() {
        let err: ServerError<Nothing> = other_error!("disk on fire: {}", 42);
        assert_eq!(err.code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);
        assert_eq!(err.to_string(), "disk on fire: 42");
    }

    #[test]
    fn test_validation_joins_messages() {
        let mut validation = ValidationError::new("description is required");
        validation.push("duration is required");
        let err: ServerError<Nothing> = validation.into();

        assert_eq!(err.code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_response(),
            ErrorResponse {
                error: "description is required; duration is required".to_string()
            }
        );
    }

    #[test]
    fn test_context_keeps_status_and_message() {
        let err: ServerError<Nothing> = ServerError::Rejection {
            code: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: "Expected json".to_string(),
        };
        let err = err.context("create_user");

        assert_eq!(err.code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(err.public_message(), "Expected json");
        assert_eq!(
            err.to_string(),
            "create_user: Rejected (415 Unsupported Media Type): Expected json"
        );
    }

    #[test]
    fn test_empty_validation_is_ok() {
        assert!(ValidationError::default().into_result().is_ok());
        assert!(ValidationError::new("nope").into_result().is_err());
    }
}
