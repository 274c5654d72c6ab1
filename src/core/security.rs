use axum::http::HeaderMap;
use subtle::ConstantTimeEq;

use crate::core::errors::ApiError;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone)]
pub struct AdminToken {
    value: Option<String>,
}

impl AdminToken {
    pub fn new(value: Option<String>) -> Self {
        Self {
            value: value.filter(|token| !token.trim().is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.value.is_some()
    }
}

/// Guards operational endpoints.
///
/// With no admin token configured the endpoints stay closed (403); otherwise
/// the `x-api-key` header must match exactly (401 on mismatch).
pub fn require_admin(headers: &HeaderMap, expected: &AdminToken) -> Result<(), ApiError> {
    let Some(expected) = expected.value.as_deref() else {
        return Err(ApiError::Forbidden);
    };

    let header_value = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if header_value.is_empty() {
        return Err(ApiError::Unauthorized);
    }

    if !bool::from(header_value.as_bytes().ct_eq(expected.as_bytes())) {
        return Err(ApiError::Unauthorized);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn require_admin_accepts_valid_header() {
        let expected = AdminToken::new(Some("secret".to_string()));
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("secret"));

        assert!(require_admin(&headers, &expected).is_ok());
    }

    #[test]
    fn require_admin_rejects_missing_or_invalid_header() {
        let expected = AdminToken::new(Some("secret".to_string()));

        let missing = require_admin(&HeaderMap::new(), &expected);
        assert!(matches!(missing, Err(ApiError::Unauthorized)));

        let mut invalid_headers = HeaderMap::new();
        invalid_headers.insert(API_KEY_HEADER, HeaderValue::from_static("wrong"));
        let invalid = require_admin(&invalid_headers, &expected);
        assert!(matches!(invalid, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn require_admin_is_forbidden_without_configured_token() {
        let expected = AdminToken::new(Some("   ".to_string()));
        assert!(!expected.is_configured());

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("anything"));
        assert!(matches!(
            require_admin(&headers, &expected),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn require_admin_rejects_non_utf8_header_value() {
        let expected = AdminToken::new(Some("secret".to_string()));
        let mut headers = HeaderMap::new();
        let non_utf8 = HeaderValue::from_bytes(&[0xFF, 0xFE, 0xFD])
            .expect("header value bytes should be accepted");
        headers.insert(API_KEY_HEADER, non_utf8);

        assert!(matches!(
            require_admin(&headers, &expected),
            Err(ApiError::Unauthorized)
        ));
    }
}
