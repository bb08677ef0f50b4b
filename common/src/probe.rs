//! # Probe Abstraction
//!
//! A probe is a single, bounded reachability check against one [`Target`].
//! Variants live in `sweepr-protocols`; the runner only sees [`Probe`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::network::target::Target;

/// Concurrency used when the caller does not pick one.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// The available probe variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeKind {
    Tcp,
    Icmp,
    Dns,
    Http,
}

impl ProbeKind {
    pub fn default_timeout(self) -> Duration {
        match self {
            ProbeKind::Tcp => Duration::from_secs(1),
            ProbeKind::Icmp => Duration::from_secs(1),
            ProbeKind::Dns => Duration::from_secs(2),
            ProbeKind::Http => Duration::from_secs(3),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ProbeKind::Tcp => "tcp-connect",
            ProbeKind::Icmp => "icmp-echo",
            ProbeKind::Dns => "dns-resolve",
            ProbeKind::Http => "http-head",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a target was not reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    Timeout,
    ConnectionRefused,
    ConnectionReset,
    HostUnreachable,
    NetworkUnreachable,
    ResolutionFailed,
    PermissionDenied,
    /// The server answered with a status of 400 or above.
    HttpStatus(u16),
    /// The probe cannot handle this kind of target (e.g. ICMP against a port).
    UnsupportedTarget,
    /// The probe panicked; the runner caught it.
    ProbePanicked,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Timeout => f.write_str("timeout"),
            ErrorKind::ConnectionRefused => f.write_str("connection-refused"),
            ErrorKind::ConnectionReset => f.write_str("connection-reset"),
            ErrorKind::HostUnreachable => f.write_str("host-unreachable"),
            ErrorKind::NetworkUnreachable => f.write_str("network-unreachable"),
            ErrorKind::ResolutionFailed => f.write_str("resolution-failed"),
            ErrorKind::PermissionDenied => f.write_str("permission-denied"),
            ErrorKind::HttpStatus(code) => write!(f, "http-status({code})"),
            ErrorKind::UnsupportedTarget => f.write_str("unsupported-target"),
            ErrorKind::ProbePanicked => f.write_str("probe-panicked"),
            ErrorKind::Other => f.write_str("other"),
        }
    }
}

/// Outcome of probing one target.
///
/// `index` is the target's enumeration position. Probes leave it at `0`;
/// the runner stamps it before the result is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub index: usize,
    pub target: Target,
    pub reachable: bool,
    pub latency: Duration,
    pub error: Option<ErrorKind>,
    /// Extra context: service name, resolved address, HTTP status or the
    /// underlying failure message.
    pub detail: Option<String>,
}

impl ProbeResult {
    pub fn reachable(target: Target, latency: Duration) -> Self {
        Self {
            index: 0,
            target,
            reachable: true,
            latency,
            error: None,
            detail: None,
        }
    }

    pub fn failed(target: Target, latency: Duration, error: ErrorKind) -> Self {
        Self {
            index: 0,
            target,
            reachable: false,
            latency,
            error: Some(error),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }
}

/// A reachability check.
///
/// Implementations must apply `timeout` themselves and turn every failure
/// into [`ProbeResult::failed`]; a probe never errors past this boundary.
#[async_trait]
pub trait Probe: Send + Sync {
    fn kind(&self) -> ProbeKind;

    async fn probe(&self, target: &Target, timeout: Duration) -> ProbeResult;
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
