//! Mapping of core errors onto HTTP responses
//!
//! - client errors: 400 with the message as a single `text/plain` line
//! - unauthorized: 401, empty body
//! - upstream and internal failures: 500, empty body, cause logged

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use dnsapi_proxy_core::{Error, ErrorKind};

/// Error returned by handlers and extractors
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status =
            StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match kind {
            ErrorKind::BadRequest | ErrorKind::Unsupported => {
                let mut message = self.0.to_string().replace('\n', " ");
                message.push('\n');
                (
                    status,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    message,
                )
                    .into_response()
            }
            ErrorKind::Unauthorized => status.into_response(),
            ErrorKind::Upstream | ErrorKind::Internal => {
                tracing::error!(error = %self.0, "Request failed");
                status.into_response()
            }
        }
    }
}
