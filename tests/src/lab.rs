//! A scripted site network: every address either stays silent, answers
//! pings only, or also runs a management session with fixed output.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use siteaudit_core::probe::Prober;
use siteaudit_core::session::{CommandOutput, DeviceTarget, SessionClient, SessionError};

#[derive(Debug, Clone)]
pub enum Device {
    PingOnly,
    Managed(String),
    RejectsLogin,
}

#[derive(Default)]
pub struct LabNetwork {
    devices: HashMap<String, Device>,
    probed: Mutex<Vec<String>>,
    sessions: Mutex<Vec<(String, String)>>,
}

impl LabNetwork {
    pub fn with(mut self, address: &str, device: Device) -> Self {
        self.devices.insert(address.to_string(), device);
        self
    }

    pub fn managed(self, address: &str, output: &str) -> Self {
        self.with(address, Device::Managed(output.to_string()))
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }

    /// `(address, command)` of every session opened so far.
    pub fn sessions(&self) -> Vec<(String, String)> {
        self.sessions.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prober for LabNetwork {
    async fn is_reachable(&self, address: &str) -> bool {
        self.probed.lock().unwrap().push(address.to_string());
        self.devices.contains_key(address)
    }
}

#[async_trait]
impl SessionClient for LabNetwork {
    async fn run_command(&self, target: &DeviceTarget) -> Result<CommandOutput, SessionError> {
        self.sessions
            .lock()
            .unwrap()
            .push((target.address.clone(), target.command.clone()));

        match self.devices.get(&target.address) {
            Some(Device::Managed(output)) => Ok(CommandOutput(output.clone())),
            Some(Device::RejectsLogin) => Err(SessionError::AuthRejected(
                target.credentials.username.clone(),
            )),
            Some(Device::PingOnly) | None => Err(SessionError::Command(format!(
                "{} refused the session",
                target.address
            ))),
        }
    }
}
