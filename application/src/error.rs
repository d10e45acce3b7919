//! [`Error`]-related definitions.

use std::fmt;

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    Json,
};
use derive_more::Error as StdError;
use http::StatusCode;
use itertools::Itertools as _;
use juniper::IntoFieldError;
use service::infra::database;
use tracerr::{Trace, Traced};

/// Defines an enum of API errors, each with its own code, HTTP status and
/// message.
///
/// ```rust,ignore
/// define_error! {
///     enum DealError {
///         #[code = "DEAL_NOT_EXISTS"]
///         #[status = NOT_FOUND]
///         #[message = "`Deal` with the specified ID does not exist"]
///         NotExists,
///     }
/// }
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// API error.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl $name {
            /// Returns the code of this error.
            #[must_use]
            pub const fn code(self) -> $crate::error::Code {
                match self {
                    $( Self::$variant => $code, )*
                }
            }

            /// Returns the [`http::StatusCode`] of this error.
            #[must_use]
            pub const fn status_code(self) -> ::http::StatusCode {
                match self {
                    $( Self::$variant => ::http::StatusCode::$status, )*
                }
            }
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                Self::new(err.code(), err.status_code(), &err)
            }
        }
    };
}

/// API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// Machine-readable [`Code`] of this [`Error`].
    pub code: Code,

    /// [`StatusCode`] responded with.
    pub status_code: StatusCode,

    /// Trace of the failure, if known.
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// Human-readable message.
    pub message: String,
}

impl Error {
    /// Creates a new [`Error`] without any trace.
    #[must_use]
    pub fn new(
        code: Code,
        status_code: StatusCode,
        message: &impl ToString,
    ) -> Self {
        Self {
            code,
            status_code,
            backtrace: None,
            message: message.to_string(),
        }
    }

    /// Creates a new [`Error`] of a malformed request.
    #[must_use]
    pub fn bad_request(message: &impl ToString) -> Self {
        Self::new("BAD_REQUEST", StatusCode::BAD_REQUEST, message)
    }

    /// Creates a new [`Error`] of an unexpected failure, exposing its
    /// message as is.
    #[must_use]
    pub fn internal(message: &impl ToString) -> Self {
        Self::new(
            "INTERNAL_SERVER_ERROR",
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: {}", self.code, self.message)?;
        if let Some(trace) = &self.backtrace {
            write!(f, "\n{}", trace.iter().join("\n"))?;
        }
        Ok(())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.status_code.is_server_error() {
            tracing::error!("{self}");
        }
        (
            self.status_code,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

impl<S> IntoFieldError<S> for Error
where
    S: From<String>,
{
    fn into_field_error(self) -> juniper::FieldError<S> {
        let mut extensions = juniper::Object::with_capacity(2);
        _ = extensions
            .add_field("code", juniper::Value::scalar(self.code.to_owned()));
        if let Some(trace) = &self.backtrace {
            _ = extensions.add_field(
                "backtrace",
                juniper::Value::list(
                    trace
                        .iter()
                        .map(|frame| juniper::Value::scalar(frame.to_string()))
                        .collect(),
                ),
            );
        }
        juniper::FieldError::new(
            self.message,
            juniper::Value::object(extensions),
        )
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Conversion of failures into API [`Error`]s.
pub trait AsError {
    /// Converts this failure into an [`Error`], if it's an expected one.
    ///
    /// [`None`] means it's unexpected, so it's reported as an internal one.
    fn try_as_error(&self) -> Option<Error>;

    /// Converts this failure into an [`Error`], falling back to an internal
    /// one.
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error().unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts this failure into an [`Error`], consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        self.as_ref().try_as_error().map(|e| Error {
            backtrace: Some(self.trace().clone()),
            ..e
        })
    }
}

impl AsError for JsonRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::bad_request(&self.body_text()))
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

#[cfg(test)]
mod spec {
    use axum::response::IntoResponse as _;
    use http::StatusCode;
    use juniper::{DefaultScalarValue, IntoFieldError as _};

    use super::Error;

    crate::define_error! {
        enum Sample {
            #[code = "SAMPLE_MISSING"]
            #[status = NOT_FOUND]
            #[message = "sample is missing"]
            Missing,
        }
    }

    #[test]
    fn defines_codes_and_statuses() {
        let err = Error::from(Sample::Missing);

        assert_eq!(err.code, "SAMPLE_MISSING");
        assert_eq!(err.status_code, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "sample is missing");
        assert_eq!(err.to_string(), "[SAMPLE_MISSING]: sample is missing");
    }

    #[test]
    fn responds_with_status() {
        let response = Error::bad_request(&"nope").into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn omits_absent_backtrace_in_graphql() {
        let err: juniper::FieldError<DefaultScalarValue> =
            Error::internal(&"boom").into_field_error();

        assert_eq!(err.message(), "boom");
        let extensions = err.extensions().as_object_value().unwrap();
        assert!(extensions.get_field_value("code").is_some());
        assert!(extensions.get_field_value("backtrace").is_none());
    }
}
