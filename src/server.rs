//! Server assembly: middleware stack, bind, graceful shutdown.

use crate::config::Config;
use crate::http;
use crate::service::AuthService;
use axum::Router;
use std::time::Duration;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Middleware for adding request ID to all requests
#[derive(Clone, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let request_id = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(request_id))
    }
}

/// An otpgate server: the auth routes plus the standard middleware stack.
pub struct App {
    config: Config,
    service: AuthService,
}

impl App {
    pub fn new(config: Config, service: AuthService) -> Self {
        Self { config, service }
    }

    fn router(&self) -> Router {
        // Middleware order (from outer to inner):
        // 1. CORS - the clients are browser apps on other origins
        // 2. Request ID - add request IDs for tracing
        // 3. Trace layer - HTTP tracing
        http::routes(self.service.clone())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(CorsLayer::permissive())
    }

    /// Extract the fully layered router without binding a socket. Test hook.
    pub fn into_router(self) -> Router {
        self.router()
    }

    /// Bind and serve until ctrl-c or SIGTERM.
    pub async fn serve(self) -> Result<(), std::io::Error> {
        let addr = self
            .config
            .server
            .addr()
            .expect("Invalid server address in config");

        let router = self.router();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        tracing::info!("Server starting on http://{}", addr);
        tracing::info!("Health check available at http://{}/health", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, starting graceful shutdown");
        },
    }

    // Give in-flight requests a grace period to finish
    tokio::time::sleep(Duration::from_secs(1)).await;
    tracing::info!("Shutdown complete");
}
