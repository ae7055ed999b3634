//! Lockout bookkeeping.
//!
//! Maps an identifier to the end of its blocking window. Installed only on
//! attempt exhaustion, consulted before every OTP operation, and evicted
//! lazily: an entry whose window has passed is equivalent to absence and is
//! removed on the next check. There is no unblock-early operation.

use crate::clock::Clock;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

/// Storage seam for lockout windows.
#[async_trait]
pub trait LockoutRegistry: Send + Sync {
    /// End of the blocking window for `identifier`, or `None` if it is not
    /// blocked. An expired entry is removed as a side effect of this read;
    /// callers must tolerate the mutation-on-read.
    async fn blocked_until(&self, identifier: &str) -> Result<Option<SystemTime>>;

    /// True iff an entry exists with `blocked_until` strictly in the future.
    async fn is_blocked(&self, identifier: &str) -> Result<bool> {
        Ok(self.blocked_until(identifier).await?.is_some())
    }

    /// Set `blocked_until = now + duration`, overwriting any existing entry.
    /// Repeated blocks do not accumulate; the window is simply replaced.
    async fn block(&self, identifier: &str, duration: Duration) -> Result<()>;

    /// Drop entries whose window has already passed. Optional memory hygiene.
    async fn cleanup_expired(&self) -> Result<usize>;
}

/// In-memory registry backed by a `HashMap`.
#[derive(Clone)]
pub struct InMemoryLockoutRegistry {
    entries: Arc<RwLock<HashMap<String, SystemTime>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryLockoutRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }
}

#[async_trait]
impl LockoutRegistry for InMemoryLockoutRegistry {
    async fn blocked_until(&self, identifier: &str) -> Result<Option<SystemTime>> {
        let mut entries = self.entries.write().await;
        let Some(&until) = entries.get(identifier) else {
            return Ok(None);
        };
        if until <= self.clock.now() {
            entries.remove(identifier);
            return Ok(None);
        }
        Ok(Some(until))
    }

    async fn block(&self, identifier: &str, duration: Duration) -> Result<()> {
        let until = self.clock.now() + duration;
        self.entries
            .write()
            .await
            .insert(identifier.to_string(), until);
        Ok(())
    }

    async fn cleanup_expired(&self) -> Result<usize> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let initial_len = entries.len();
        entries.retain(|_, &mut until| until > now);
        Ok(initial_len - entries.len())
    }
}
