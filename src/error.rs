use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// JSON body for a failed request
#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorResponse {
    /// Full error text, e.g. "City not found: Atlantis"
    pub error: String,
    /// Stable code for clients, e.g. "CITY_NOT_FOUND"
    pub code: &'static str,
    /// Text a weather card shows in place of the description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<&'static str>,
    /// Sending the same request later may succeed
    pub retryable: bool,
}

impl ErrorResponse {
    pub fn from_error<E: HttpError + ?Sized>(err: &E) -> Self {
        Self {
            error: err.to_string(),
            code: err.error_code(),
            display: err.display_text(),
            retryable: err.retryable(),
        }
    }
}

/// Errors that know how to present themselves over HTTP
pub trait HttpError: std::error::Error {
    fn status_code(&self) -> StatusCode;

    fn error_code(&self) -> &'static str;

    /// Placeholder text for the card, when the failure replaces one
    fn display_text(&self) -> Option<&'static str> {
        None
    }

    fn retryable(&self) -> bool {
        matches!(
            self.status_code(),
            StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
        )
    }
}

pub fn error_response<E: HttpError>(err: &E) -> Response {
    let status = err.status_code();
    let body = ErrorResponse::from_error(err);

    if status.is_server_error() {
        tracing::error!(error = %body.error, %status, code = body.code, retryable = body.retryable, "Request failed");
    } else {
        tracing::warn!(error = %body.error, %status, code = body.code, "Request rejected");
    }

    (status, Json(body)).into_response()
}

/// Implement `IntoResponse` for an `HttpError` type
#[macro_export]
macro_rules! impl_into_response {
    ($error_type:ty) => {
        impl axum::response::IntoResponse for $error_type {
            fn into_response(self) -> axum::response::Response {
                $crate::error::error_response(&self)
            }
        }
    };
}
