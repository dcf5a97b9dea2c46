use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_ROUTER_COMMAND: &str = "show arp vrf TFIBER-IP-MGMT | include BDI201";
pub const DEFAULT_SWITCH_COMMAND: &str = "show vlan | include 201";
pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_CONCURRENCY: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
    #[error("ping attempts must be at least 1")]
    ZeroPingAttempts,
    #[error("{0} timeout must be greater than zero")]
    ZeroTimeout(&'static str),
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("{0} command must not be empty")]
    EmptyCommand(&'static str),
}

/// The single login used for every managed device.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Wait for a single echo reply.
    pub timeout: Duration,
    /// Echo requests sent before declaring the host unreachable.
    pub attempts: u8,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(1_000),
            attempts: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub port: u16,
    /// Bounds TCP connect and authentication, each.
    pub connect_timeout: Duration,
    /// Bounds the wait for the complete command output.
    pub read_timeout: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_SSH_PORT,
            connect_timeout: Duration::from_secs(15),
            read_timeout: Duration::from_secs(60),
        }
    }
}

/// Canned diagnostic command per device class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSet {
    pub router: String,
    pub switch: String,
}

impl Default for CommandSet {
    fn default() -> Self {
        Self {
            router: DEFAULT_ROUTER_COMMAND.to_string(),
            switch: DEFAULT_SWITCH_COMMAND.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub credentials: Arc<Credentials>,
    pub commands: CommandSet,
    pub probe: ProbeSettings,
    pub session: SessionSettings,
    /// Maximum number of records audited at the same time.
    pub concurrency: usize,
    /// Sessions still pending this long after the batch started are abandoned.
    pub batch_deadline: Option<Duration>,
}

impl AuditConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials: Arc::new(credentials),
            commands: CommandSet::default(),
            probe: ProbeSettings::default(),
            session: SessionSettings::default(),
            concurrency: DEFAULT_CONCURRENCY,
            batch_deadline: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.probe.attempts == 0 {
            return Err(ConfigError::ZeroPingAttempts);
        }
        if self.probe.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("ping"));
        }
        if self.session.connect_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("connect"));
        }
        if self.session.read_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("read"));
        }
        if self.batch_deadline.is_some_and(|d| d.is_zero()) {
            return Err(ConfigError::ZeroTimeout("batch"));
        }
        if self.credentials.username.trim().is_empty() {
            return Err(ConfigError::EmptyUsername);
        }
        if self.commands.router.trim().is_empty() {
            return Err(ConfigError::EmptyCommand("router"));
        }
        if self.commands.switch.trim().is_empty() {
            return Err(ConfigError::EmptyCommand("switch"));
        }
        Ok(())
    }
}
