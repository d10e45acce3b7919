//! [`Context`]-related definitions.

use std::sync::atomic::{AtomicU16, Ordering};

use axum::{async_trait, extract::FromRequestParts};
use http::StatusCode;
use juniper::{
    http::{GraphQLBatchResponse, GraphQLResponse},
    IntoFieldError as _,
};

use crate::{Error, JuniperResponse, Service};

/// Context of a single GraphQL request.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] the request is served by.
    service: Service,

    /// [`StatusCode`] of the last [`Error`] the request failed with, or `0`
    /// if it hasn't failed.
    failed_with: AtomicU16,
}

impl Context {
    /// Creates a new [`Context`] serving a request with the provided
    /// [`Service`].
    #[must_use]
    pub fn new(service: Service) -> Self {
        Self {
            service,
            failed_with: AtomicU16::new(0),
        }
    }

    /// Returns the [`Service`] serving the request.
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the [`StatusCode`] to respond with if the request fails.
    ///
    /// It's the one of the last [`Error`] passed through
    /// [`Context::error()`], if any.
    #[must_use]
    pub fn error_status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.failed_with.load(Ordering::Relaxed))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Returns a [`Result::map_err()`] closure remembering the
    /// [`StatusCode`] of the [`Error`] it passes through.
    pub fn error(&self) -> impl FnOnce(Error) -> Error + '_ {
        move |err| {
            self.failed_with
                .store(err.status_code.as_u16(), Ordering::Relaxed);
            err
        }
    }
}

impl juniper::Context for Context {}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = JuniperResponse;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Service>()
            .cloned()
            .map(Self::new)
            .ok_or_else(|| {
                let err = Error::internal(&"`Service` is not provided");
                JuniperResponse {
                    status_code: err.status_code,
                    response: GraphQLBatchResponse::Single(
                        GraphQLResponse::error(err.into_field_error()),
                    ),
                }
            })
    }
}
