use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::service::AuthPolicy;

/// Main configuration for an otpgate server
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

/// Serializable form of the OTP limits; converted into an
/// [`AuthPolicy`] when the service is wired up.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default = "default_otp_ttl_secs")]
    pub otp_ttl_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_lockout_secs")]
    pub lockout_secs: u64,
    #[serde(default = "default_code_length")]
    pub code_length: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            otp_ttl_secs: default_otp_ttl_secs(),
            max_attempts: default_max_attempts(),
            lockout_secs: default_lockout_secs(),
            code_length: default_code_length(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_otp_ttl_secs() -> u64 {
    5 * 60
}

fn default_max_attempts() -> u32 {
    3
}

fn default_lockout_secs() -> u64 {
    10 * 60
}

fn default_code_length() -> u32 {
    6
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl AuthSettings {
    pub fn policy(&self) -> AuthPolicy {
        AuthPolicy::new()
            .otp_ttl(Duration::from_secs(self.otp_ttl_secs))
            .max_attempts(self.max_attempts)
            .lockout_duration(Duration::from_secs(self.lockout_secs))
    }
}

/// Builder for Config with environment variable support
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.config.server.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_auth(mut self, auth: AuthSettings) -> Self {
        self.config.auth = auth;
        self
    }

    /// Overlay `OTPGATE_`-prefixed environment variables onto the current
    /// values. Unparseable values are ignored rather than fatal.
    pub fn from_env(mut self) -> Self {
        if let Some(host) = env_var("OTPGATE_HOST") {
            self.config.server.host = host;
        }
        if let Some(port) = env_var("OTPGATE_PORT").and_then(|v| v.parse().ok()) {
            self.config.server.port = port;
        }
        if let Some(level) = env_var("OTPGATE_LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = env_var("OTPGATE_LOG_JSON").and_then(|v| v.parse().ok()) {
            self.config.logging.json = json;
        }
        if let Some(ttl) = env_var("OTPGATE_OTP_TTL_SECS").and_then(|v| v.parse().ok()) {
            self.config.auth.otp_ttl_secs = ttl;
        }
        if let Some(max) = env_var("OTPGATE_MAX_ATTEMPTS").and_then(|v| v.parse().ok()) {
            self.config.auth.max_attempts = max;
        }
        if let Some(lockout) = env_var("OTPGATE_LOCKOUT_SECS").and_then(|v| v.parse().ok()) {
            self.config.auth.lockout_secs = lockout;
        }
        if let Some(length) = env_var("OTPGATE_CODE_LENGTH").and_then(|v| v.parse().ok()) {
            self.config.auth.code_length = length;
        }
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
