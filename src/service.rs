//! Authentication orchestration.
//!
//! [`AuthService`] wires the registries into the three public operations
//! (request, verify, whoami) and owns all the business rules. Per
//! identifier the implicit states are Idle (no challenge, not blocked),
//! Pending (live challenge) and Blocked (lockout active); every operation
//! below is one transition of that machine.

use crate::challenge::{OtpLedger, VerifyOutcome};
use crate::clock::{Clock, SystemClock};
use crate::code::{CodeGenerator, RandomCodeGenerator};
use crate::directory::{DemoDirectory, UserDirectory};
use crate::error::{AuthError, Result};
use crate::lockout::LockoutRegistry;
use crate::notify::{ConsoleNotifier, OtpNotifier};
use crate::session::{Identity, SessionRegistry};
use std::sync::Arc;
use std::time::Duration;

/// Default challenge lifetime.
const DEFAULT_OTP_TTL: Duration = Duration::from_secs(5 * 60);

/// Default failed attempts allowed per challenge.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default lockout window installed on attempt exhaustion.
const DEFAULT_LOCKOUT_DURATION: Duration = Duration::from_secs(10 * 60);

/// Tunable limits for the OTP state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPolicy {
    /// How long a challenge stays verifiable.
    pub otp_ttl: Duration,
    /// Failed attempts tolerated per challenge before lockout. Re-requesting
    /// a code resets the counter; the lockout on exhaustion is what bounds
    /// the overall retry budget.
    pub max_attempts: u32,
    /// How long an identifier stays blocked after exhaustion. Repeated
    /// attempts during the window do not extend it.
    pub lockout_duration: Duration,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            otp_ttl: DEFAULT_OTP_TTL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            lockout_duration: DEFAULT_LOCKOUT_DURATION,
        }
    }
}

impl AuthPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn otp_ttl(mut self, ttl: Duration) -> Self {
        self.otp_ttl = ttl;
        self
    }

    #[must_use]
    pub fn max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max;
        self
    }

    #[must_use]
    pub fn lockout_duration(mut self, duration: Duration) -> Self {
        self.lockout_duration = duration;
        self
    }
}

/// The OTP authentication service.
///
/// Cheap to clone; clones share the underlying registries.
#[derive(Clone)]
pub struct AuthService {
    ledger: Arc<dyn OtpLedger>,
    lockouts: Arc<dyn LockoutRegistry>,
    sessions: Arc<dyn SessionRegistry>,
    directory: Arc<dyn UserDirectory>,
    generator: Arc<dyn CodeGenerator>,
    notifier: Arc<dyn OtpNotifier>,
    clock: Arc<dyn Clock>,
    policy: AuthPolicy,
}

impl AuthService {
    /// Create a service over the given registries with default policy,
    /// demo directory, console delivery and the system clock. Swap any of
    /// those with the `with_*` builders.
    pub fn new(
        ledger: Arc<dyn OtpLedger>,
        lockouts: Arc<dyn LockoutRegistry>,
        sessions: Arc<dyn SessionRegistry>,
    ) -> Self {
        Self {
            ledger,
            lockouts,
            sessions,
            directory: Arc::new(DemoDirectory::new()),
            generator: Arc::new(RandomCodeGenerator::default()),
            notifier: Arc::new(ConsoleNotifier::new()),
            clock: Arc::new(SystemClock),
            policy: AuthPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: AuthPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_directory(mut self, directory: Arc<dyn UserDirectory>) -> Self {
        self.directory = directory;
        self
    }

    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn OtpNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn policy(&self) -> &AuthPolicy {
        &self.policy
    }

    /// Request a one-time code for `identifier`.
    ///
    /// Always installs a fresh challenge when allowed: re-requesting while
    /// one is pending replaces it, restarting the window and resetting the
    /// attempt counter. The code leaves the service only through the
    /// notifier, never through the return value.
    pub async fn request_otp(&self, identifier: &str) -> Result<()> {
        if identifier.is_empty() {
            return Err(AuthError::invalid_input(
                "identifier (email/phone) is required",
            ));
        }
        self.ensure_not_blocked(identifier).await?;

        let code = self.generator.generate();
        self.ledger
            .create(identifier, &code, self.policy.otp_ttl)
            .await?;

        // Fire-and-forget: a delivery failure must not undo the challenge.
        if let Err(error) = self.notifier.deliver(identifier, &code).await {
            tracing::warn!(
                target: "auth.otp.delivery",
                identifier = %identifier,
                error = %error,
                "OTP delivery failed"
            );
        }

        tracing::info!(
            target: "auth.otp.requested",
            identifier = %identifier,
            ttl_secs = self.policy.otp_ttl.as_secs(),
            "OTP challenge installed"
        );
        Ok(())
    }

    /// Verify a submitted code and, on success, issue a session token.
    pub async fn verify_otp(&self, identifier: &str, code: &str) -> Result<String> {
        if identifier.is_empty() || code.is_empty() {
            return Err(AuthError::invalid_input("identifier and otp are required"));
        }
        self.ensure_not_blocked(identifier).await?;

        match self
            .ledger
            .consume(identifier, code, self.policy.max_attempts)
            .await?
        {
            VerifyOutcome::NoChallenge => Err(AuthError::NoPendingChallenge),
            VerifyOutcome::Expired => {
                tracing::debug!(
                    target: "auth.otp.expired",
                    identifier = %identifier,
                    "Challenge expired before verification"
                );
                Err(AuthError::Expired)
            }
            VerifyOutcome::Mismatch { attempts_left } => {
                tracing::debug!(
                    target: "auth.otp.mismatch",
                    identifier = %identifier,
                    attempts_left = attempts_left,
                    "Wrong code submitted"
                );
                Err(AuthError::InvalidCode { attempts_left })
            }
            VerifyOutcome::Exhausted => {
                self.lockouts
                    .block(identifier, self.policy.lockout_duration)
                    .await?;
                tracing::warn!(
                    target: "auth.lockout.installed",
                    identifier = %identifier,
                    duration_secs = self.policy.lockout_duration.as_secs(),
                    "Attempts exhausted, identifier locked out"
                );
                Err(AuthError::blocked(self.policy.lockout_duration))
            }
            VerifyOutcome::Success => {
                let identity = self.directory.find(identifier).await?;
                let token = self.sessions.issue(identity).await?;
                tracing::info!(
                    target: "auth.otp.verified",
                    identifier = %identifier,
                    "OTP verified, session issued"
                );
                Ok(token)
            }
        }
    }

    /// Resolve a session token to the identity bound at issuance.
    pub async fn who_am_i(&self, token: &str) -> Result<Identity> {
        if token.is_empty() {
            return Err(AuthError::unauthorized("Missing bearer token."));
        }
        self.sessions
            .lookup(token)
            .await?
            .ok_or_else(|| AuthError::unauthorized("Invalid or expired token."))
    }

    async fn ensure_not_blocked(&self, identifier: &str) -> Result<()> {
        if let Some(until) = self.lockouts.blocked_until(identifier).await? {
            let retry_after = until
                .duration_since(self.clock.now())
                .unwrap_or_default();
            tracing::debug!(
                target: "auth.lockout.blocked",
                identifier = %identifier,
                remaining_secs = retry_after.as_secs(),
                "Operation rejected by active lockout"
            );
            return Err(AuthError::blocked(retry_after));
        }
        Ok(())
    }
}
