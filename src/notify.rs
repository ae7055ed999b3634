//! OTP delivery seam.
//!
//! The state machine treats delivery as fire-and-forget: a notifier failure
//! is logged and never rolls back the challenge or reaches the client.

use crate::error::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Delivers a one-time code out-of-band.
///
/// Implement this to plug in an SMS or email provider. The core never
/// depends on delivery succeeding or being observable.
#[async_trait]
pub trait OtpNotifier: Send + Sync {
    async fn deliver(&self, identifier: &str, code: &str) -> Result<()>;

    /// Whether the delivery backend is reachable.
    fn is_healthy(&self) -> bool {
        true
    }
}

/// A notifier that logs the code instead of sending it.
///
/// # Security Warning
///
/// **FOR DEVELOPMENT USE ONLY.** This writes live one-time codes to the
/// log stream, which in containerized environments is usually captured and
/// shipped elsewhere. A production deployment must inject a real
/// SMS/email notifier instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OtpNotifier for ConsoleNotifier {
    async fn deliver(&self, identifier: &str, code: &str) -> Result<()> {
        tracing::info!(
            target: "auth.otp.delivery",
            identifier = %identifier,
            code = %code,
            "OTP issued (console delivery, development only)"
        );
        Ok(())
    }
}

/// Captures deliveries instead of sending them, so tests can read back the
/// code that was "sent".
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    deliveries: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(identifier, code)` pairs delivered so far, in order.
    pub fn deliveries(&self) -> Vec<(String, String)> {
        self.deliveries.lock().unwrap().clone()
    }

    /// The most recently delivered code for `identifier`.
    pub fn last_code_for(&self, identifier: &str) -> Option<String> {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(id, _)| id == identifier)
            .map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl OtpNotifier for RecordingNotifier {
    async fn deliver(&self, identifier: &str, code: &str) -> Result<()> {
        self.deliveries
            .lock()
            .unwrap()
            .push((identifier.to_string(), code.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_notifier_delivers_without_error() {
        let notifier = ConsoleNotifier::new();
        notifier.deliver("a@x.com", "123456").await.unwrap();
        assert!(notifier.is_healthy());
    }

    #[tokio::test]
    async fn test_recording_notifier_captures_in_order() {
        let notifier = RecordingNotifier::new();
        notifier.deliver("a@x.com", "111111").await.unwrap();
        notifier.deliver("b@x.com", "222222").await.unwrap();
        notifier.deliver("a@x.com", "333333").await.unwrap();

        assert_eq!(notifier.deliveries().len(), 3);
        assert_eq!(notifier.last_code_for("a@x.com").as_deref(), Some("333333"));
        assert_eq!(notifier.last_code_for("b@x.com").as_deref(), Some("222222"));
        assert_eq!(notifier.last_code_for("c@x.com"), None);
    }
}
