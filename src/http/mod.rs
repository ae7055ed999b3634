//! HTTP boundary: routes and wire types.
//!
//! The transport is deliberately thin; every rule lives in
//! [`AuthService`](crate::service::AuthService), and the handlers only
//! translate between JSON bodies and service calls.

mod extract;
mod handlers;
mod types;

pub use extract::bearer_token;
pub use handlers::{HealthResponse, HealthStatus};
pub use types::{MeResponse, MessageResponse, RequestOtpBody, VerifiedResponse, VerifyOtpBody};

use crate::service::AuthService;
use axum::{
    Router,
    routing::{get, post},
};

/// Build the service router. State is already applied; callers can serve it
/// directly or merge it into a larger application.
pub fn routes(service: AuthService) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/request-otp", post(handlers::request_otp))
        .route("/auth/verify-otp", post(handlers::verify_otp))
        .route("/auth/me", get(handlers::me))
        .with_state(service)
}
