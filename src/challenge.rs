//! OTP challenge ledger.
//!
//! Maps an identifier to its single active challenge and owns the
//! verify-and-consume protocol. At most one live challenge exists per
//! identifier; creating a new one discards any prior challenge
//! unconditionally, and every terminal verification outcome (success,
//! expiry, exhaustion) deletes the entry.

use crate::clock::Clock;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

/// The single live OTP record for an identifier.
#[derive(Debug, Clone)]
pub struct OtpChallenge {
    /// Fixed-length numeric code, leading zeros permitted.
    pub code: String,
    /// Invalid strictly after this instant.
    pub expires_at: SystemTime,
    /// Failed verification attempts against this specific challenge.
    pub attempts: u32,
}

/// Result of a verify-and-consume call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// No entry exists for the identifier.
    NoChallenge,
    /// The entry existed but had aged out; it has been deleted.
    Expired,
    /// Wrong code with attempts remaining; the counter was incremented in place.
    Mismatch { attempts_left: u32 },
    /// Wrong code and the attempt budget is spent; the entry has been deleted.
    /// The caller is responsible for installing the lockout.
    Exhausted,
    /// Exact match; the entry has been deleted.
    Success,
}

/// Storage seam for OTP challenges.
///
/// Implementations must make each call atomic per identifier: no lost
/// `attempts` updates and no double-consumption of a single challenge under
/// concurrent verification.
#[async_trait]
pub trait OtpLedger: Send + Sync {
    /// Unconditionally install a fresh challenge for `identifier`,
    /// discarding any prior one. The attempt counter starts at zero.
    async fn create(&self, identifier: &str, code: &str, ttl: Duration) -> Result<()>;

    /// Verify `supplied_code` against the live challenge and apply the
    /// consume protocol (see [`VerifyOutcome`]). Codes compare by exact
    /// string equality, never numerically.
    async fn consume(
        &self,
        identifier: &str,
        supplied_code: &str,
        max_attempts: u32,
    ) -> Result<VerifyOutcome>;

    /// Drop challenges that have already expired. Optional memory hygiene;
    /// expiry is always enforced lazily in `consume` regardless.
    async fn cleanup_expired(&self) -> Result<usize>;
}

/// In-memory ledger backed by a `HashMap`.
///
/// The whole map sits behind one `RwLock`; `consume` holds the write lock
/// for its full read-modify-write, which is what makes the protocol atomic.
#[derive(Clone)]
pub struct InMemoryOtpLedger {
    challenges: Arc<RwLock<HashMap<String, OtpChallenge>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryOtpLedger {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            challenges: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Snapshot the live challenge for an identifier, if any. Test hook.
    pub async fn challenge(&self, identifier: &str) -> Option<OtpChallenge> {
        self.challenges.read().await.get(identifier).cloned()
    }
}

#[async_trait]
impl OtpLedger for InMemoryOtpLedger {
    async fn create(&self, identifier: &str, code: &str, ttl: Duration) -> Result<()> {
        let challenge = OtpChallenge {
            code: code.to_string(),
            expires_at: self.clock.now() + ttl,
            attempts: 0,
        };
        self.challenges
            .write()
            .await
            .insert(identifier.to_string(), challenge);
        Ok(())
    }

    async fn consume(
        &self,
        identifier: &str,
        supplied_code: &str,
        max_attempts: u32,
    ) -> Result<VerifyOutcome> {
        let mut challenges = self.challenges.write().await;

        let Some(challenge) = challenges.get_mut(identifier) else {
            return Ok(VerifyOutcome::NoChallenge);
        };

        if self.clock.now() > challenge.expires_at {
            challenges.remove(identifier);
            return Ok(VerifyOutcome::Expired);
        }

        if challenge.code != supplied_code {
            challenge.attempts += 1;
            let attempts = challenge.attempts;
            if attempts >= max_attempts {
                challenges.remove(identifier);
                return Ok(VerifyOutcome::Exhausted);
            }
            return Ok(VerifyOutcome::Mismatch {
                attempts_left: max_attempts - attempts,
            });
        }

        challenges.remove(identifier);
        Ok(VerifyOutcome::Success)
    }

    async fn cleanup_expired(&self) -> Result<usize> {
        let now = self.clock.now();
        let mut challenges = self.challenges.write().await;
        let initial_len = challenges.len();
        challenges.retain(|_, challenge| now <= challenge.expires_at);
        Ok(initial_len - challenges.len())
    }
}
