//! `Authorization: Bearer <token>` parsing.

use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use http::HeaderMap;

/// Header carrying the service API key.
pub const X_API_KEY: &str = "x-api-key";

/// Extract the bearer token from the `Authorization` header.
///
/// Returns `None` when the header is absent, uses another scheme, or the token
/// part is empty.
///
/// ```
/// use http::HeaderMap;
/// use warden_auth_types::bearer::bearer_token;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("authorization", "Bearer abc.def.ghi".parse().unwrap());
/// assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def.ghi"));
/// ```
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth = headers.typed_get::<Authorization<Bearer>>()?;
    let token = auth.token().trim();
    (!token.is_empty()).then(|| token.to_owned())
}

/// Extract the `x-api-key` header value.
pub fn api_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(X_API_KEY)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}
