use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use sweepr_common::SweeprError;
use sweepr_common::probe::ErrorKind;
use tokio::time::{Instant, timeout_at};
use tracing::debug;

/// Resolves `host` through the system resolver, giving up at `deadline`.
///
/// Literal addresses skip the lookup.
pub async fn resolve_first(
    host: &str,
    port: u16,
    deadline: Instant,
) -> Result<SocketAddr, ErrorKind> {
    if let Ok(addr) = host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(addr, port));
    }

    match timeout_at(deadline, tokio::net::lookup_host((host, port))).await {
        Ok(Ok(mut addrs)) => addrs.next().ok_or(ErrorKind::ResolutionFailed),
        Ok(Err(e)) => {
            debug!("lookup of {host} failed: {e}");
            Err(ErrorKind::ResolutionFailed)
        }
        Err(_elapsed) => Err(ErrorKind::Timeout),
    }
}

/// Resolves a host that a whole run depends on. Failing to resolve it is
/// a setup error, not a per-target one.
pub async fn resolve_host(
    host: &str,
    timeout: Duration,
) -> sweepr_common::error::Result<IpAddr> {
    let deadline = Instant::now() + timeout;
    resolve_first(host, 0, deadline)
        .await
        .map(|addr| addr.ip())
        .map_err(|kind| SweeprError::invalid(host, format!("host does not resolve ({kind})")))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
