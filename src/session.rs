//! Session registry.
//!
//! Maps opaque bearer tokens to the identity authenticated at issuance.
//! Tokens are never reused across sessions and never expire server-side;
//! logout is purely client-side disposal of the stored token.

use crate::clock::Clock;
use crate::error::Result;
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

/// The identity record bound to a session at verification time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: u64,
    /// The identifier (email or phone) the session was authenticated with.
    pub identifier: String,
    pub name: String,
}

/// Storage seam for issued sessions.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Issue a fresh token, unique among currently live tokens, bound to
    /// `identity`.
    async fn issue(&self, identity: Identity) -> Result<String>;

    /// Resolve a token to its identity. Unknown tokens are `None`, not an
    /// error; the caller decides whether that is worth a 401.
    async fn lookup(&self, token: &str) -> Result<Option<Identity>>;
}

/// In-memory registry backed by a `HashMap`.
#[derive(Clone)]
pub struct InMemorySessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Identity>>>,
    clock: Arc<dyn Clock>,
}

impl InMemorySessionRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Number of live sessions. Test hook.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Millisecond timestamp prefix plus 32 CSPRNG bytes. The time component
/// orders tokens and keeps uniqueness from resting on randomness alone;
/// the random component carries the unguessability.
fn generate_token(now: SystemTime) -> String {
    let millis = now
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{}-{}", millis, URL_SAFE_NO_PAD.encode(bytes))
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn issue(&self, identity: Identity) -> Result<String> {
        let mut sessions = self.sessions.write().await;
        loop {
            let token = generate_token(self.clock.now());
            // 256 bits of randomness makes a collision with a live token
            // effectively impossible; the loop keeps the uniqueness
            // guarantee unconditional anyway.
            if !sessions.contains_key(&token) {
                sessions.insert(token.clone(), identity);
                return Ok(token);
            }
        }
    }

    async fn lookup(&self, token: &str) -> Result<Option<Identity>> {
        Ok(self.sessions.read().await.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, SystemClock};

    fn demo_identity(identifier: &str) -> Identity {
        Identity {
            id: 1,
            identifier: identifier.to_string(),
            name: "Demo User".to_string(),
        }
    }

    #[tokio::test]
    async fn test_issue_then_lookup() {
        let registry = InMemorySessionRegistry::new(Arc::new(SystemClock));
        let token = registry.issue(demo_identity("a@x.com")).await.unwrap();

        let identity = registry.lookup(&token).await.unwrap().unwrap();
        assert_eq!(identity.identifier, "a@x.com");
        assert_eq!(identity.name, "Demo User");
    }

    #[tokio::test]
    async fn test_unknown_token_is_none() {
        let registry = InMemorySessionRegistry::new(Arc::new(SystemClock));
        assert!(registry.lookup("no-such-token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_tokens_are_unique_even_with_a_frozen_clock() {
        // A stopped clock removes the time component from the picture, so
        // uniqueness has to come from the random half.
        let registry = InMemorySessionRegistry::new(Arc::new(ManualClock::default()));
        let a = registry.issue(demo_identity("a@x.com")).await.unwrap();
        let b = registry.issue(demo_identity("a@x.com")).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_token_shape() {
        let registry = InMemorySessionRegistry::new(Arc::new(SystemClock));
        let token = registry.issue(demo_identity("a@x.com")).await.unwrap();

        let (millis, random) = token.split_once('-').expect("time-random shape");
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
        // 32 bytes of URL-safe base64 without padding.
        assert_eq!(random.len(), 43);
    }

    #[tokio::test]
    async fn test_sessions_never_expire_server_side() {
        let clock = Arc::new(ManualClock::default());
        let registry = InMemorySessionRegistry::new(clock.clone());
        let token = registry.issue(demo_identity("a@x.com")).await.unwrap();

        clock.advance(std::time::Duration::from_secs(365 * 24 * 3600));
        assert!(registry.lookup(&token).await.unwrap().is_some());
    }
}
