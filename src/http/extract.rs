//! Bearer credential extraction.

use crate::error::AuthError;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

/// Extract the bearer token from an `Authorization` header.
///
/// Missing header, wrong scheme and empty token all come back as
/// `Unauthorized`; the caller never has to distinguish them.
pub fn bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AuthError::unauthorized("Missing or invalid Authorization header."))?;

    let token = value.strip_prefix("Bearer ").ok_or_else(|| {
        AuthError::unauthorized("Invalid Authorization header format. Expected: Bearer <token>")
    })?;

    if token.is_empty() {
        return Err(AuthError::unauthorized("Empty bearer token."));
    }

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_valid_bearer_header() {
        let headers = headers_with_auth("Bearer test_token_123");
        assert_eq!(bearer_token(&headers).unwrap(), "test_token_123");
    }

    #[test]
    fn test_missing_header() {
        let headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());
    }

    #[test]
    fn test_wrong_scheme() {
        let headers = headers_with_auth("Basic credentials");
        assert!(bearer_token(&headers).is_err());
    }

    #[test]
    fn test_empty_token() {
        let headers = headers_with_auth("Bearer ");
        assert!(bearer_token(&headers).is_err());
    }
}
