//! HTTP error envelope. Every failure leaves the bridge as a structured
//! JSON body with a generic message plus, where the backend supplied one,
//! a detail string the caller can use to tell transient from permanent.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Unauthorized,
    Forbidden,
    Validation,
    BackendUnavailable,
    DirectoryUnavailable,
    SendFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    message: String,
    details: Option<String>,
    /// Legacy send routes carry a numeric `status: 0` flag on failure.
    legacy_status_flag: bool,
}

impl ApiError {
    pub fn unauthorized() -> Self {
        Self::new(ApiErrorKind::Unauthorized, "Unauthorized")
    }

    pub fn forbidden() -> Self {
        Self::new(ApiErrorKind::Forbidden, "Forbidden")
    }

    pub fn validation(message: &str) -> Self {
        Self::new(ApiErrorKind::Validation, message)
    }

    pub fn directory_unavailable(message: &str, details: String) -> Self {
        Self::new(ApiErrorKind::DirectoryUnavailable, message).with_details(details)
    }

    pub fn backend_unavailable(message: &str, details: String) -> Self {
        Self::new(ApiErrorKind::BackendUnavailable, message).with_details(details)
    }

    pub fn send_failed(message: &str) -> Self {
        Self::new(ApiErrorKind::SendFailed, message)
    }

    pub fn with_details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }

    /// Marks the error as coming from a legacy send route.
    pub fn with_status_flag(mut self) -> Self {
        self.legacy_status_flag = true;
        self
    }

    fn new(kind: ApiErrorKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_owned(),
            details: None,
            legacy_status_flag: false,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self.kind {
            ApiErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ApiErrorKind::Validation => StatusCode::BAD_REQUEST,
            ApiErrorKind::BackendUnavailable
            | ApiErrorKind::DirectoryUnavailable
            | ApiErrorKind::SendFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "error": self.message });

        if let Some(details) = &self.details {
            body["details"] = json!(details);
        }

        if self.legacy_status_flag {
            body["status"] = json!(0);
        }

        (self.status_code(), Json(body)).into_response()
    }
}
