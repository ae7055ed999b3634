//! Otpgate - OTP challenge/response authentication
//!
//! Otpgate implements the full lifecycle of one-time-password login: a
//! client requests a short-lived numeric code for an identifier (email or
//! phone), submits it with a bounded attempt budget, and on success receives
//! an opaque session token usable to fetch identity information.
//!
//! # Features
//!
//! - **OTP lifecycle**: per-identifier challenges with TTL expiry,
//!   attempt-limited verification and single-use consumption
//! - **Lockout**: temporary blocking windows on attempt exhaustion,
//!   evicted lazily with no background sweepers
//! - **Sessions**: collision-resistant opaque tokens bound to an identity
//! - **Pluggable seams**: storage, delivery, identity lookup and the clock
//!   are all traits with in-memory/demo implementations included
//! - **HTTP**: Axum routes for the three operations, plus health
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use otpgate::{
//!     App, AuthService, Clock, ConfigBuilder, InMemoryLockoutRegistry,
//!     InMemoryOtpLedger, InMemorySessionRegistry, SystemClock,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     otpgate::init_tracing();
//!
//!     let config = ConfigBuilder::new().from_env().build();
//!     let clock: Arc<dyn Clock> = Arc::new(SystemClock);
//!     let service = AuthService::new(
//!         Arc::new(InMemoryOtpLedger::new(clock.clone())),
//!         Arc::new(InMemoryLockoutRegistry::new(clock.clone())),
//!         Arc::new(InMemorySessionRegistry::new(clock.clone())),
//!     );
//!
//!     App::new(config, service).serve().await.unwrap();
//! }
//! ```

pub mod challenge;
pub mod clock;
pub mod code;
mod config;
pub mod directory;
mod error;
pub mod http;
pub mod lockout;
pub mod notify;
mod server;
pub mod service;
pub mod session;
pub mod testing;

// Re-exports for public API
pub use challenge::{InMemoryOtpLedger, OtpChallenge, OtpLedger, VerifyOutcome};
pub use clock::{Clock, ManualClock, SystemClock};
pub use code::{CodeGenerator, FixedCodeGenerator, RandomCodeGenerator};
pub use config::{AuthSettings, Config, ConfigBuilder, LoggingConfig, ServerConfig};
pub use directory::{DemoDirectory, UserDirectory};
pub use error::{AuthError, ErrorBody, Result};
pub use lockout::{InMemoryLockoutRegistry, LockoutRegistry};
pub use notify::{ConsoleNotifier, OtpNotifier, RecordingNotifier};
pub use server::App;
pub use service::{AuthPolicy, AuthService};
pub use session::{Identity, InMemorySessionRegistry, SessionRegistry};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults
///
/// This should be called early in your application, typically in main()
/// before wiring the service.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "otpgate=debug")
/// - `OTPGATE_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("OTPGATE_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Initialize tracing with a custom configuration
pub fn init_tracing_with_config(config: &Config) {
    let env_filter = EnvFilter::new(&config.logging.level);

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
