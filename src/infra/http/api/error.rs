use std::error::Error as StdError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::error::ErrorReport;

/// JSON error body returned by every API route: `{error, details?}`.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<String>,
    cause: Option<ErrorReport>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details,
            cause: None,
        }
    }

    /// Records the full error chain for the response log.
    pub fn caused_by(mut self, source: &'static str, error: &dyn StdError) -> Self {
        self.cause = Some(ErrorReport::from_error(source, error));
        self
    }

    pub fn bad_request(message: impl Into<String>, details: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, details)
    }

    pub fn not_found(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, Some(details.into()))
    }

    pub fn internal(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
            Some(details.into()),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(mut self) -> Response {
        let report = self.cause.take().unwrap_or_else(|| {
            let detail = match self.details.as_deref() {
                Some(details) => format!("{}: {details}", self.message),
                None => self.message.clone(),
            };
            ErrorReport::from_message("infra::http::api", detail)
        });
        // Client-facing 404s drop the internal detail.
        let details = if self.status == StatusCode::NOT_FOUND {
            None
        } else {
            self.details
        };
        let body = ApiErrorBody {
            error: self.message,
            details,
        };
        let mut response = (self.status, Json(body)).into_response();
        report.attach(&mut response);
        response
    }
}
