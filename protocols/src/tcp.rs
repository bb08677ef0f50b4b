use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use sweepr_common::network::target::Target;
use sweepr_common::probe::{ErrorKind, Probe, ProbeKind, ProbeResult};
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout_at};
use tracing::debug;

use crate::{classify, lookup, services};

/// Port used when the target itself carries no port.
pub const DEFAULT_PORT: u16 = 443;

/// Completes (or fails) a TCP three-way handshake.
///
/// * [`Target::Port`] connects to the configured host address, which is
///   resolved once before the run rather than per port.
/// * [`Target::Ip`] and [`Target::Host`] connect to the configured port.
#[derive(Debug, Clone)]
pub struct TcpConnectProbe {
    host: Option<IpAddr>,
    port: u16,
    refused_means_alive: bool,
}

impl TcpConnectProbe {
    /// Port scanning: every target is a port on `host`.
    pub fn ports_on(host: IpAddr) -> Self {
        Self {
            host: Some(host),
            port: DEFAULT_PORT,
            refused_means_alive: false,
        }
    }

    /// Host discovery: a refused connection still proves the host is up.
    pub fn handshake(port: u16) -> Self {
        Self {
            host: None,
            port,
            refused_means_alive: true,
        }
    }

    /// Connect probe against `port` without host-discovery semantics.
    pub fn connect(port: u16) -> Self {
        Self {
            host: None,
            port,
            refused_means_alive: false,
        }
    }

    /// Port used for [`Target::Ip`] and [`Target::Host`] targets.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    async fn resolve(&self, target: &Target, deadline: Instant) -> Result<SocketAddr, ErrorKind> {
        match target {
            Target::Port(port) => {
                let host = self.host.ok_or(ErrorKind::UnsupportedTarget)?;
                Ok(SocketAddr::new(host, *port))
            }
            Target::Ip(addr) => Ok(SocketAddr::new(*addr, self.port)),
            Target::Host(name) => lookup::resolve_first(name, self.port, deadline).await,
        }
    }
}

#[async_trait]
impl Probe for TcpConnectProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Tcp
    }

    async fn probe(&self, target: &Target, timeout: Duration) -> ProbeResult {
        let start = Instant::now();
        let deadline = start + timeout;

        let socket_addr = match self.resolve(target, deadline).await {
            Ok(addr) => addr,
            Err(kind) => return ProbeResult::failed(target.clone(), start.elapsed(), kind),
        };

        match timeout_at(deadline, TcpStream::connect(socket_addr)).await {
            Ok(Ok(_stream)) => {
                let result = ProbeResult::reachable(target.clone(), start.elapsed());
                match services::service_name(socket_addr.port()) {
                    Some(service) => result.with_detail(service),
                    None => result,
                }
            }
            Ok(Err(e)) => {
                let kind = classify::io_error_kind(&e);
                debug!("{socket_addr}: {e}");
                if self.refused_means_alive && kind == ErrorKind::ConnectionRefused {
                    return ProbeResult::reachable(target.clone(), start.elapsed())
                        .with_detail("refused");
                }
                ProbeResult::failed(target.clone(), start.elapsed(), kind)
                    .with_detail(e.to_string())
            }
            Err(_elapsed) => {
                ProbeResult::failed(target.clone(), start.elapsed(), ErrorKind::Timeout)
            }
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
