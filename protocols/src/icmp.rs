//! ICMP echo ("ping") probe.
//!
//! Needs either a raw socket or an unprivileged ICMP datagram socket
//! (`net.ipv4.ping_group_range` on Linux). When neither can be opened every
//! target is reported as `permission-denied` instead of aborting the run.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use surge_ping::{Client, Config, ICMP, PingIdentifier, PingSequence, SurgeError};
use sweepr_common::network::target::Target;
use sweepr_common::probe::{ErrorKind, Probe, ProbeKind, ProbeResult};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::{classify, lookup};

const PAYLOAD: [u8; 32] = [0u8; 32];

pub struct IcmpProbe {
    v4: Option<Client>,
    v6: Option<Client>,
}

impl IcmpProbe {
    /// Opens the ICMP sockets. Must be called from within a tokio runtime.
    pub fn new() -> Self {
        let v4 = Client::new(&Config::default())
            .inspect_err(|e| warn!("ICMPv4 socket unavailable: {e}"))
            .ok();
        let v6 = Client::new(&Config::builder().kind(ICMP::V6).build())
            .inspect_err(|e| debug!("ICMPv6 socket unavailable: {e}"))
            .ok();

        Self { v4, v6 }
    }

    fn client_for(&self, addr: &IpAddr) -> Option<&Client> {
        match addr {
            IpAddr::V4(_) => self.v4.as_ref(),
            IpAddr::V6(_) => self.v6.as_ref(),
        }
    }
}

#[async_trait]
impl Probe for IcmpProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Icmp
    }

    async fn probe(&self, target: &Target, timeout: Duration) -> ProbeResult {
        let start = Instant::now();
        let deadline = start + timeout;

        let addr: IpAddr = match target {
            Target::Ip(addr) => *addr,
            Target::Host(name) => match lookup::resolve_first(name, 0, deadline).await {
                Ok(socket_addr) => socket_addr.ip(),
                Err(kind) => return ProbeResult::failed(target.clone(), start.elapsed(), kind),
            },
            Target::Port(_) => {
                let kind = ErrorKind::UnsupportedTarget;
                return ProbeResult::failed(target.clone(), start.elapsed(), kind);
            }
        };

        let Some(client) = self.client_for(&addr) else {
            return ProbeResult::failed(target.clone(), start.elapsed(), ErrorKind::PermissionDenied)
                .with_detail("no ICMP socket available");
        };

        let mut pinger = client.pinger(addr, PingIdentifier(rand::random())).await;
        pinger.timeout(deadline.saturating_duration_since(Instant::now()));

        match pinger.ping(PingSequence(0), &PAYLOAD).await {
            Ok((_packet, rtt)) => ProbeResult::reachable(target.clone(), rtt)
                .with_detail(format!("echo reply from {addr}")),
            Err(SurgeError::Timeout { .. }) => {
                ProbeResult::failed(target.clone(), start.elapsed(), ErrorKind::Timeout)
            }
            Err(SurgeError::IOError(e)) => {
                ProbeResult::failed(target.clone(), start.elapsed(), classify::io_error_kind(&e))
                    .with_detail(e.to_string())
            }
            Err(e) => ProbeResult::failed(target.clone(), start.elapsed(), ErrorKind::Other)
                .with_detail(e.to_string()),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
