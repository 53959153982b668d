use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Error taxonomy shared by every Warden service.
///
/// Services keep their own fine-grained error enums and map each variant onto
/// one class; the class decides the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed input or a forbidden combination of inputs.
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    Forbidden,
    /// A time-boxed artifact (OTP) was used after its deadline.
    Expired,
    /// A third-party dependency (mail relay, identity provider) failed.
    Upstream,
    Internal,
}

impl ErrorClass {
    pub fn status(self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Expired => StatusCode::GONE,
            Self::Upstream => StatusCode::BAD_GATEWAY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON envelope returned for every error: a stable machine-readable `kind`
/// and a human `message`. Never carries internal identifiers.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub kind: &'a str,
    pub message: String,
}

/// Render an error envelope with the status derived from `class`.
pub fn error_response(class: ErrorClass, kind: &str, message: String) -> Response {
    (class.status(), axum::Json(ErrorBody { kind, message })).into_response()
}
