//! ICMP echo over `surge-ping` sockets.
//!
//! One client per address family is opened up front and shared by every
//! caller. Unprivileged DGRAM sockets match replies on `(host, sequence)`
//! only, so sequence numbers come from one counter per prober and no two
//! outstanding requests to a host share one.

use std::net::{IpAddr, Ipv6Addr};
use std::sync::atomic::{AtomicU16, Ordering};

use async_trait::async_trait;
use siteaudit_common::config::ProbeSettings;
use surge_ping::{Client, Config, ICMP, PingIdentifier, PingSequence};
use tracing::{debug, trace};

use super::Prober;

const PAYLOAD: [u8; 56] = [0; 56];

pub struct IcmpProber {
    v4: Client,
    v6: Option<Client>,
    sequences: SequenceCounter,
    settings: ProbeSettings,
}

/// Hands out echo sequence numbers, wrapping at `u16::MAX`.
#[derive(Debug, Default)]
struct SequenceCounter(AtomicU16);

impl SequenceCounter {
    fn next(&self) -> PingSequence {
        PingSequence(self.0.fetch_add(1, Ordering::Relaxed))
    }
}

impl IcmpProber {
    /// Opens the ICMP sockets. Fails when the OS refuses them (e.g. no
    /// `CAP_NET_RAW` and unprivileged ICMP disabled).
    pub fn new(settings: ProbeSettings) -> std::io::Result<Self> {
        let v4 = Client::new(&Config::default())?;
        let v6 = match Client::new(&Config::builder().kind(ICMP::V6).build()) {
            Ok(client) => Some(client),
            Err(e) => {
                debug!("IPv6 ICMP socket unavailable: {e}");
                None
            }
        };
        Ok(Self {
            v4,
            v6,
            sequences: SequenceCounter::default(),
            settings,
        })
    }

    async fn ping(&self, ip: IpAddr) -> bool {
        let client = match ip {
            IpAddr::V4(_) => &self.v4,
            IpAddr::V6(_) => match &self.v6 {
                Some(client) => client,
                None => return false,
            },
        };

        let mut pinger = client.pinger(ip, PingIdentifier(rand::random())).await;
        pinger.timeout(self.settings.timeout);

        for attempt in 0..self.settings.attempts {
            match pinger.ping(self.sequences.next(), &PAYLOAD).await {
                Ok((_packet, rtt)) => {
                    trace!(%ip, ?rtt, "Echo reply");
                    return true;
                }
                Err(e) => trace!(%ip, attempt, error = %e, "Echo attempt failed"),
            }
        }
        false
    }
}

#[async_trait]
impl Prober for IcmpProber {
    async fn is_reachable(&self, address: &str) -> bool {
        match super::resolve(address, self.settings.timeout).await {
            Some(ip) if !is_unspecified(&ip) => self.ping(ip).await,
            _ => false,
        }
    }
}

fn is_unspecified(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_unspecified() || v4.is_broadcast(),
        IpAddr::V6(v6) => *v6 == Ipv6Addr::UNSPECIFIED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn concurrent_callers_never_share_a_sequence() {
        let counter = Arc::new(SequenceCounter::default());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let counter = Arc::clone(&counter);
            handles.push(tokio::spawn(async move {
                (0..50).map(|_| counter.next().0).collect::<Vec<u16>>()
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for seq in handle.await.unwrap() {
                assert!(seen.insert(seq), "sequence {seq} handed out twice");
            }
        }
        assert_eq!(seen.len(), 400);
    }

    #[test]
    fn sequence_wraps_instead_of_overflowing() {
        let counter = SequenceCounter(AtomicU16::new(u16::MAX));
        assert_eq!(counter.next().0, u16::MAX);
        assert_eq!(counter.next().0, 0);
    }

    #[tokio::test]
    #[ignore]
    async fn concurrent_pings_of_one_host_all_answer() {
        let prober = Arc::new(IcmpProber::new(ProbeSettings::default()).unwrap());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let prober = Arc::clone(&prober);
            handles.push(tokio::spawn(async move {
                prober.is_reachable("127.0.0.1").await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }
    }

    #[tokio::test]
    #[ignore]
    async fn icmp_probe_should_answer_for_loopback() {
        let prober = IcmpProber::new(ProbeSettings::default()).unwrap();
        assert!(prober.is_reachable("127.0.0.1").await);
    }

    #[tokio::test]
    #[ignore]
    async fn icmp_probe_should_timeout_on_unreachable_ip() {
        let prober = IcmpProber::new(ProbeSettings::default()).unwrap();
        assert!(!prober.is_reachable("203.0.113.1").await);
    }

    #[tokio::test]
    #[ignore]
    async fn icmp_probe_rejects_unspecified_address() {
        let prober = IcmpProber::new(ProbeSettings::default()).unwrap();
        assert!(!prober.is_reachable("0.0.0.0").await);
    }
}
