//! Axum handlers for the three authentication operations.

use axum::{Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};

use super::extract::bearer_token;
use super::types::{MeResponse, MessageResponse, RequestOtpBody, VerifiedResponse, VerifyOtpBody};
use crate::error::Result;
use crate::service::AuthService;

/// `POST /auth/request-otp`
///
/// The acknowledgment never carries the code; it only leaves the service
/// through the configured notifier.
pub async fn request_otp(
    State(service): State<AuthService>,
    Json(body): Json<RequestOtpBody>,
) -> Result<Json<MessageResponse>> {
    service.request_otp(&body.identifier).await?;
    Ok(Json(MessageResponse {
        message: "OTP generated and sent (check the server log).".to_string(),
    }))
}

/// `POST /auth/verify-otp`
pub async fn verify_otp(
    State(service): State<AuthService>,
    Json(body): Json<VerifyOtpBody>,
) -> Result<Json<VerifiedResponse>> {
    let token = service.verify_otp(&body.identifier, &body.otp).await?;
    Ok(Json(VerifiedResponse {
        message: "OTP verified successfully.".to_string(),
        token,
    }))
}

/// `GET /auth/me`
pub async fn me(
    State(service): State<AuthService>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>> {
    let token = bearer_token(&headers)?;
    let user = service.who_am_i(&token).await?;
    Ok(Json(MeResponse { user }))
}

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
}

/// `GET /health`
///
/// The registries are plain in-process maps, so reachable means healthy.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
    })
}
