//! Builds a [`Probe`] from command-line style options.

use std::sync::Arc;
use std::time::Duration;

use sweepr_common::SweeprError;
use sweepr_common::network::target::{Target, TargetSet};
use sweepr_common::probe::{Probe, ProbeKind};
use sweepr_protocols::lookup;
use sweepr_protocols::tcp::DEFAULT_PORT;
use sweepr_protocols::{DnsProbe, HttpHeadProbe, IcmpProbe, TcpConnectProbe};
use tracing::debug;

/// Everything needed to construct any probe variant. Fields a variant
/// does not use are ignored.
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    pub kind: ProbeKind,
    /// Host whose ports are scanned by a TCP probe.
    pub host: Option<String>,
    /// Port for TCP probes against IP or host targets.
    pub port: Option<u16>,
    /// Suffix appended to every DNS target.
    pub domain: Option<String>,
    /// Base URL that HTTP targets are paths below.
    pub base_url: Option<String>,
    pub timeout: Duration,
    /// Count a refused TCP connection as a live host.
    pub handshake: bool,
}

impl ProbeOptions {
    pub fn new(kind: ProbeKind) -> Self {
        Self {
            kind,
            host: None,
            port: None,
            domain: None,
            base_url: None,
            timeout: kind.default_timeout(),
            handshake: false,
        }
    }

    /// Rejects target sets the probe could only answer with
    /// `unsupported-target`.
    pub fn validate_against(&self, targets: &TargetSet) -> sweepr_common::error::Result<()> {
        let Some(port) = targets.iter().find_map(|target| match target {
            Target::Port(port) => Some(port),
            _ => None,
        }) else {
            return Ok(());
        };

        if self.kind != ProbeKind::Tcp {
            return Err(SweeprError::invalid(
                port.to_string(),
                format!("{} probes take hosts or addresses, not ports", self.kind),
            ));
        }
        if self.host.is_none() {
            return Err(SweeprError::invalid(
                port.to_string(),
                "port targets need a host to connect to",
            ));
        }
        Ok(())
    }
}

/// Builds the probe for `options`.
///
/// A TCP host is resolved here, once, so that port targets never trigger a
/// lookup of their own. A host that does not resolve fails the whole run.
pub async fn build_probe(options: &ProbeOptions) -> anyhow::Result<Arc<dyn Probe>> {
    debug!("building {} probe", options.kind);

    let probe: Arc<dyn Probe> = match options.kind {
        ProbeKind::Tcp => {
            let port = options.port.unwrap_or(DEFAULT_PORT);
            let tcp = match &options.host {
                Some(host) => {
                    let addr = lookup::resolve_host(host, options.timeout).await?;
                    debug!("{host} resolved to {addr}");
                    TcpConnectProbe::ports_on(addr).with_port(port)
                }
                None if options.handshake => TcpConnectProbe::handshake(port),
                None => TcpConnectProbe::connect(port),
            };
            Arc::new(tcp)
        }
        ProbeKind::Icmp => Arc::new(IcmpProbe::new()),
        ProbeKind::Dns => Arc::new(DnsProbe::new(options.domain.clone(), options.timeout)),
        ProbeKind::Http => {
            Arc::new(HttpHeadProbe::new(options.base_url.clone(), options.timeout)?)
        }
    };

    Ok(probe)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
