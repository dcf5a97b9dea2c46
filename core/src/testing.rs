//! Test doubles for the [`Prober`] and [`SessionClient`] seams.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::probe::Prober;
use crate::session::{CommandOutput, DeviceTarget, SessionClient, SessionError};

/// Reachable iff the address is in the set. Panics on the poisoned address.
#[derive(Default)]
pub struct FakeProber {
    reachable: HashSet<String>,
    poisoned: Option<String>,
    pub calls: AtomicUsize,
}

impl FakeProber {
    pub fn reaching(addresses: &[&str]) -> Self {
        Self {
            reachable: addresses.iter().map(|a| a.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn panicking_on(mut self, address: &str) -> Self {
        self.poisoned = Some(address.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for FakeProber {
    async fn is_reachable(&self, address: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.poisoned.as_deref() == Some(address) {
            panic!("probe defect for {address}");
        }
        self.reachable.contains(address)
    }
}

/// Answers from a table keyed by address; unknown addresses fail to connect.
#[derive(Default)]
pub struct FakeSessions {
    outputs: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    pub calls: AtomicUsize,
}

impl FakeSessions {
    pub fn answering(pairs: &[(&str, &str)]) -> Self {
        Self {
            outputs: pairs
                .iter()
                .map(|(a, o)| (a.to_string(), o.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn delayed(mut self, address: &str, delay: Duration) -> Self {
        self.delays.insert(address.to_string(), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionClient for FakeSessions {
    async fn run_command(&self, target: &DeviceTarget) -> Result<CommandOutput, SessionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&target.address) {
            tokio::time::sleep(*delay).await;
        }
        match self.outputs.get(&target.address) {
            Some(output) => Ok(CommandOutput(output.clone())),
            None => Err(SessionError::AuthRejected(target.credentials.username.clone())),
        }
    }
}
