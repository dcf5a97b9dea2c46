//! Host reachability checks.
//!
//! [`Prober`] is the seam the record processor depends on. Two strategies
//! implement it: the [`IcmpProber`] speaks ICMP echo over its own sockets, and
//! the [`CommandProber`] shells out to the system `ping` binary for hosts where
//! ICMP sockets cannot be opened without privileges.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use siteaudit_common::config::ProbeSettings;
use tokio::time::timeout;
use tracing::{debug, warn};

mod command;
mod icmp;

pub use command::CommandProber;
pub use icmp::IcmpProber;

/// Answers "is this address alive?".
///
/// Implementations never fail: any error, timeout or malformed address is
/// simply "not reachable".
#[async_trait]
pub trait Prober: Send + Sync {
    async fn is_reachable(&self, address: &str) -> bool;
}

/// Picks the ICMP socket prober when the host allows it, the `ping` binary otherwise.
pub fn system_prober(settings: ProbeSettings) -> Arc<dyn Prober> {
    match IcmpProber::new(settings) {
        Ok(prober) => {
            debug!("Using ICMP socket prober");
            Arc::new(prober)
        }
        Err(e) => {
            warn!("ICMP sockets unavailable ({e}), falling back to the system ping command");
            Arc::new(CommandProber::new(settings))
        }
    }
}

/// Turns an address string into an IP, resolving hostnames within `wait`.
pub(crate) async fn resolve(address: &str, wait: Duration) -> Option<IpAddr> {
    let address = address.trim();
    if let Ok(ip) = address.parse::<IpAddr>() {
        return Some(ip);
    }
    if !is_hostname(address) {
        debug!(address, "Rejecting malformed address");
        return None;
    }

    match timeout(wait, tokio::net::lookup_host((address, 0))).await {
        Ok(Ok(mut addrs)) => addrs.next().map(|sock| sock.ip()),
        Ok(Err(e)) => {
            debug!(address, error = %e, "Hostname lookup failed");
            None
        }
        Err(_elapsed) => {
            debug!(address, "Hostname lookup timed out");
            None
        }
    }
}

/// RFC 1123 style host name: dot separated labels of alphanumerics and inner hyphens.
pub(crate) fn is_hostname(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }
    s.trim_end_matches('.').split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}
