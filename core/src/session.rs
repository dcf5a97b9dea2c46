//! Management sessions against routers and switches.
//!
//! A session is opened for exactly one command and closed again. Callers only
//! learn "output" or "no output"; the [`SessionError`] cause is for logs.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use siteaudit_common::config::{AuditConfig, Credentials, SessionSettings};
use thiserror::Error;

mod ssh;

pub use ssh::SshSessionClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Router,
    Switch,
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceClass::Router => f.write_str("router"),
            DeviceClass::Switch => f.write_str("switch"),
        }
    }
}

/// Phase of a session that ran out of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStage {
    Connect,
    Authenticate,
    Read,
}

impl fmt::Display for SessionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStage::Connect => f.write_str("connect"),
            SessionStage::Authenticate => f.write_str("authenticate"),
            SessionStage::Read => f.write_str("read"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("connection failed: {0}")]
    Connect(#[source] russh::Error),
    #[error("authentication rejected for user '{0}'")]
    AuthRejected(String),
    #[error("{stage} timed out after {after:?}")]
    Timeout { stage: SessionStage, after: Duration },
    #[error("ssh protocol error: {0}")]
    Protocol(#[from] russh::Error),
    #[error("command failed: {0}")]
    Command(String),
    #[error("batch deadline expired before the session finished")]
    DeadlineExceeded,
}

/// Everything needed for one session attempt.
#[derive(Debug, Clone)]
pub struct DeviceTarget {
    pub class: DeviceClass,
    pub address: String,
    pub credentials: Arc<Credentials>,
    pub command: String,
    pub settings: SessionSettings,
}

impl DeviceTarget {
    pub fn new(class: DeviceClass, address: &str, cfg: &AuditConfig) -> Self {
        let command = match class {
            DeviceClass::Router => cfg.commands.router.clone(),
            DeviceClass::Switch => cfg.commands.switch.clone(),
        };
        Self {
            class,
            address: address.to_string(),
            credentials: Arc::clone(&cfg.credentials),
            command,
            settings: cfg.session,
        }
    }
}

/// Raw text a device printed in response to the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput(pub String);

impl CommandOutput {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
pub trait SessionClient: Send + Sync {
    async fn run_command(&self, target: &DeviceTarget) -> Result<CommandOutput, SessionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_picks_command_by_class() {
        let mut cfg = AuditConfig::new(Credentials::new("user", "password"));
        cfg.commands.router = "show arp".into();
        cfg.commands.switch = "show vlan brief".into();

        let router = DeviceTarget::new(DeviceClass::Router, "10.0.0.1", &cfg);
        let switch = DeviceTarget::new(DeviceClass::Switch, "10.0.0.2", &cfg);

        assert_eq!(router.command, "show arp");
        assert_eq!(switch.command, "show vlan brief");
        assert!(Arc::ptr_eq(&router.credentials, &switch.credentials));
    }

    #[test]
    fn timeout_error_names_the_stage() {
        let err = SessionError::Timeout {
            stage: SessionStage::Read,
            after: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "read timed out after 5s");
    }
}
