//! DNS resolution probe.
//!
//! Forward lookups for hostnames and wordlist entries (optionally suffixed
//! with a domain, which is how subdomain enumeration works) and reverse
//! lookups for IP addresses.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use sweepr_common::network::target::Target;
use sweepr_common::probe::{ErrorKind, Probe, ProbeKind, ProbeResult};
use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};

use crate::classify;

pub struct DnsProbe {
    resolver: TokioAsyncResolver,
    domain: Option<String>,
}

impl DnsProbe {
    /// Builds a resolver from the system configuration, falling back to the
    /// resolver's defaults when it cannot be read.
    ///
    /// Each query makes a single attempt bounded by `timeout`.
    pub fn new(domain: Option<String>, timeout: Duration) -> Self {
        let (config, mut opts) = match hickory_resolver::system_conf::read_system_conf() {
            Ok(system) => system,
            Err(e) => {
                warn!("falling back to default resolvers: {e}");
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };
        opts.timeout = timeout;
        opts.attempts = 1;

        let domain = domain
            .map(|d| d.trim_matches('.').to_string())
            .filter(|d| !d.is_empty());

        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
            domain,
        }
    }

    /// `www` becomes `www.example.com` when the probe has a domain.
    pub fn qualify(&self, entry: &str) -> String {
        let entry = entry.trim_end_matches('.');
        match &self.domain {
            Some(domain) => format!("{entry}.{domain}"),
            None => entry.to_string(),
        }
    }

    async fn forward(
        &self,
        target: &Target,
        entry: &str,
        start: Instant,
        deadline: Instant,
    ) -> ProbeResult {
        let name = self.qualify(entry);

        match timeout_at(deadline, self.resolver.lookup_ip(name.as_str())).await {
            Ok(Ok(lookup)) => match lookup.iter().next() {
                Some(addr) => ProbeResult::reachable(target.clone(), start.elapsed())
                    .with_detail(format!("{name} -> {addr}")),
                None => {
                    let kind = ErrorKind::ResolutionFailed;
                    ProbeResult::failed(target.clone(), start.elapsed(), kind).with_detail(name)
                }
            },
            Ok(Err(e)) => {
                debug!("{name}: {e}");
                ProbeResult::failed(target.clone(), start.elapsed(), resolve_error_kind(&e))
                    .with_detail(name)
            }
            Err(_elapsed) => {
                ProbeResult::failed(target.clone(), start.elapsed(), ErrorKind::Timeout)
            }
        }
    }

    async fn reverse(
        &self,
        target: &Target,
        addr: IpAddr,
        start: Instant,
        deadline: Instant,
    ) -> ProbeResult {
        match timeout_at(deadline, self.resolver.reverse_lookup(addr)).await {
            Ok(Ok(lookup)) => match lookup.iter().next() {
                Some(name) => {
                    let name = name.to_string();
                    ProbeResult::reachable(target.clone(), start.elapsed())
                        .with_detail(name.trim_end_matches('.'))
                }
                None => {
                    let kind = ErrorKind::ResolutionFailed;
                    ProbeResult::failed(target.clone(), start.elapsed(), kind)
                }
            },
            Ok(Err(e)) => {
                debug!("PTR {addr}: {e}");
                ProbeResult::failed(target.clone(), start.elapsed(), resolve_error_kind(&e))
            }
            Err(_elapsed) => {
                ProbeResult::failed(target.clone(), start.elapsed(), ErrorKind::Timeout)
            }
        }
    }
}

#[async_trait]
impl Probe for DnsProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Dns
    }

    async fn probe(&self, target: &Target, timeout: Duration) -> ProbeResult {
        let start = Instant::now();
        let deadline = start + timeout;

        match target {
            Target::Host(entry) => self.forward(target, entry, start, deadline).await,
            Target::Ip(addr) => self.reverse(target, *addr, start, deadline).await,
            Target::Port(_) => {
                ProbeResult::failed(target.clone(), start.elapsed(), ErrorKind::UnsupportedTarget)
            }
        }
    }
}

fn resolve_error_kind(err: &ResolveError) -> ErrorKind {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { .. } => ErrorKind::ResolutionFailed,
        ResolveErrorKind::Timeout => ErrorKind::Timeout,
        ResolveErrorKind::Io(io_err) => classify::io_error_kind(io_err),
        _ => ErrorKind::Other,
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
