//! Request and response types for the authentication endpoints.

use crate::session::Identity;
use serde::{Deserialize, Serialize};

/// Body of `POST /auth/request-otp`.
///
/// Fields default to empty so a missing field reaches the service as empty
/// input and comes back as a 400, not a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestOtpBody {
    /// Email or phone.
    #[serde(default)]
    pub identifier: String,
}

/// Body of `POST /auth/verify-otp`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpBody {
    /// Email or phone.
    #[serde(default)]
    pub identifier: String,
    /// The submitted one-time code.
    #[serde(default)]
    pub otp: String,
}

/// Acknowledgment with no payload beyond a human-readable message.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Successful verification: the freshly issued session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifiedResponse {
    pub message: String,
    pub token: String,
}

/// Response of `GET /auth/me`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: Identity,
}
