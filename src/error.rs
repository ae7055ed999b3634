use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::time::Duration;

/// The main error type for OTP authentication operations
///
/// Every failure the service can produce is one of these kinds; none of them
/// is process-fatal, and none of them mutates state beyond what its variant
/// documents (a `Blocked` returned from verification means the lockout was
/// already installed).
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A required field was missing or empty. Locally correctable, no state change.
    #[error("{0}")]
    InvalidInput(String),

    /// The identifier is inside a lockout window. Terminal for the current window.
    #[error("Too many attempts. This identifier is blocked, try again in {}s.", .retry_after.as_secs())]
    Blocked { retry_after: Duration },

    /// Verification was called with no outstanding challenge.
    #[error("No OTP requested for this identifier.")]
    NoPendingChallenge,

    /// The challenge aged out. Recoverable by requesting a new code.
    #[error("OTP has expired. Please request a new one.")]
    Expired,

    /// Wrong code with attempts remaining. Recoverable by resubmitting.
    #[error("Invalid OTP. Attempts left: {attempts_left}")]
    InvalidCode { attempts_left: u32 },

    /// Bad or unknown session credential. Recoverable only via re-authentication.
    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for service and handler code
pub type Result<T> = std::result::Result<T, AuthError>;

/// Wire shape for error responses.
///
/// `attempts_left` is present only for code mismatches, `retry_after_secs`
/// only for lockouts.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts_left: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

impl AuthError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn blocked(retry_after: Duration) -> Self {
        Self::Blocked { retry_after }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_)
            | Self::NoPendingChallenge
            | Self::Expired
            | Self::InvalidCode { .. } => StatusCode::BAD_REQUEST,
            Self::Blocked { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a message suitable for client responses.
    ///
    /// Client errors (4xx) expose their message since the client needs to know
    /// what went wrong. Internal errors are replaced with a generic message;
    /// the details are logged server-side only.
    fn safe_message(&self) -> String {
        match self {
            Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    fn body(&self) -> ErrorBody {
        ErrorBody {
            message: self.safe_message(),
            attempts_left: match self {
                Self::InvalidCode { attempts_left } => Some(*attempts_left),
                _ => None,
            },
            retry_after_secs: match self {
                Self::Blocked { retry_after } => Some(retry_after.as_secs()),
                _ => None,
            },
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.body();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::invalid_input("identifier is required").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::blocked(Duration::from_secs(600)).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AuthError::NoPendingChallenge.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::Expired.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AuthError::InvalidCode { attempts_left: 2 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::unauthorized("bad token").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Internal(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_code_body_carries_attempts_left() {
        let body = AuthError::InvalidCode { attempts_left: 1 }.body();
        assert_eq!(body.attempts_left, Some(1));
        assert_eq!(body.retry_after_secs, None);
        assert_eq!(body.message, "Invalid OTP. Attempts left: 1");
    }

    #[test]
    fn test_blocked_body_carries_wait_hint() {
        let body = AuthError::blocked(Duration::from_secs(600)).body();
        assert_eq!(body.retry_after_secs, Some(600));
        assert!(body.message.contains("600s"));
    }

    #[test]
    fn test_internal_details_are_redacted() {
        let err = AuthError::Internal(anyhow::anyhow!("db password is hunter2"));
        let body = err.body();
        assert_eq!(body.message, "Internal server error");
        assert!(!body.message.contains("hunter2"));
    }

    #[test]
    fn test_body_serialization_skips_absent_fields() {
        let json = serde_json::to_string(&AuthError::Expired.body()).unwrap();
        assert!(json.contains("\"message\""));
        assert!(!json.contains("attempts_left"));
        assert!(!json.contains("retry_after_secs"));
    }

    #[tokio::test]
    async fn test_into_response_statuses() {
        let response = AuthError::unauthorized("Invalid or expired token.").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::blocked(Duration::from_secs(60)).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
