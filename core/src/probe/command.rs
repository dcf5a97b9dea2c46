use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use siteaudit_common::config::ProbeSettings;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, trace};

use super::Prober;

/// Slack given to the `ping` process on top of its own reply wait.
const PROCESS_GRACE: Duration = Duration::from_millis(500);

/// Unprivileged fallback that runs the system `ping` binary, one echo per attempt.
pub struct CommandProber {
    settings: ProbeSettings,
}

impl CommandProber {
    pub fn new(settings: ProbeSettings) -> Self {
        Self { settings }
    }

    async fn ping_once(&self, address: &str) -> bool {
        let mut cmd = Command::new("ping");
        cmd.args(ping_args(address, self.settings.timeout))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        match timeout(self.settings.timeout + PROCESS_GRACE, cmd.status()).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(e)) => {
                debug!(address, error = %e, "Could not run ping");
                false
            }
            Err(_elapsed) => {
                trace!(address, "ping process timed out");
                false
            }
        }
    }
}

#[async_trait]
impl Prober for CommandProber {
    async fn is_reachable(&self, address: &str) -> bool {
        let address = address.trim();
        // Only literals and host names reach the command line.
        if address.parse::<std::net::IpAddr>().is_err() && !super::is_hostname(address) {
            return false;
        }

        for _ in 0..self.settings.attempts {
            if self.ping_once(address).await {
                return true;
            }
        }
        false
    }
}

#[cfg(windows)]
fn ping_args(address: &str, wait: Duration) -> Vec<String> {
    vec![
        "-n".into(),
        "1".into(),
        "-w".into(),
        wait.as_millis().max(1).to_string(),
        address.into(),
    ]
}

#[cfg(not(windows))]
fn ping_args(address: &str, wait: Duration) -> Vec<String> {
    // `-W` takes whole seconds on Linux and BSD.
    let secs = wait.as_secs_f64().ceil().max(1.0) as u64;
    vec![
        "-c".into(),
        "1".into(),
        "-W".into(),
        secs.to_string(),
        address.into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(windows))]
    fn ping_args_round_wait_up_to_seconds() {
        let args = ping_args("10.0.0.1", Duration::from_millis(1_200));
        assert_eq!(args, vec!["-c", "1", "-W", "2", "10.0.0.1"]);
    }

    #[tokio::test]
    async fn option_like_addresses_never_reach_ping() {
        let prober = CommandProber::new(ProbeSettings::default());
        assert!(!prober.is_reachable("-f").await);
        assert!(!prober.is_reachable("").await);
    }

    #[tokio::test]
    #[ignore]
    async fn command_probe_should_answer_for_loopback() {
        let prober = CommandProber::new(ProbeSettings::default());
        assert!(prober.is_reachable("127.0.0.1").await);
    }
}
