//! HTTP HEAD probe.
//!
//! With a base URL every [`Target::Host`] is treated as a path below it,
//! which turns the probe into a directory scanner. Without one, the target
//! itself is the server.

use std::net::IpAddr;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, redirect};
use sweepr_common::network::target::Target;
use sweepr_common::probe::{ErrorKind, Probe, ProbeKind, ProbeResult};
use tokio::time::{Instant, timeout_at};
use tracing::debug;

use crate::classify;

pub struct HttpHeadProbe {
    client: Client,
    base_url: Option<String>,
}

impl HttpHeadProbe {
    pub fn new(base_url: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .no_proxy()
            .user_agent(concat!("sweepr/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;

        let base_url = base_url.map(|url| normalize_base(&url));

        Ok(Self { client, base_url })
    }

    /// The URL a target maps to, or `None` if the target cannot be expressed
    /// as one.
    pub fn url_for(&self, target: &Target) -> Option<String> {
        match (&self.base_url, target) {
            (Some(base), Target::Host(entry)) => {
                Some(format!("{base}/{}", entry.trim_start_matches('/')))
            }
            (Some(base), Target::Ip(addr)) => Some(format!("{base}/{addr}")),
            (None, Target::Host(host)) => Some(normalize_base(host) + "/"),
            (None, Target::Ip(IpAddr::V4(addr))) => Some(format!("http://{addr}/")),
            (None, Target::Ip(IpAddr::V6(addr))) => Some(format!("http://[{addr}]/")),
            (_, Target::Port(_)) => None,
        }
    }
}

/// Adds a scheme when missing and drops trailing slashes.
fn normalize_base(url: &str) -> String {
    let url = url.trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

#[async_trait]
impl Probe for HttpHeadProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Http
    }

    async fn probe(&self, target: &Target, timeout: Duration) -> ProbeResult {
        let start = Instant::now();
        let deadline = start + timeout;

        let Some(url) = self.url_for(target) else {
            let kind = ErrorKind::UnsupportedTarget;
            return ProbeResult::failed(target.clone(), start.elapsed(), kind);
        };

        match timeout_at(deadline, self.client.head(&url).send()).await {
            Ok(Ok(response)) => {
                let status = response.status();
                if status.as_u16() < 400 {
                    ProbeResult::reachable(target.clone(), start.elapsed())
                        .with_detail(status.as_u16().to_string())
                } else {
                    ProbeResult::failed(
                        target.clone(),
                        start.elapsed(),
                        ErrorKind::HttpStatus(status.as_u16()),
                    )
                }
            }
            Ok(Err(e)) => {
                debug!("HEAD {url}: {e}");
                let kind = if e.is_timeout() {
                    ErrorKind::Timeout
                } else {
                    classify::error_chain_kind(&e)
                };
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

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const TIMEOUT: Duration = Duration::from_secs(2);

    /// Answers every request on a fresh loopback port with `status_line`.
    async fn serve(status_line: &'static str) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let _ = socket.read(&mut buf).await;
                    let response = format!(
                        "HTTP/1.1 {status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });

        port
    }

    #[test]
    fn url_mapping() {
        let dirs = HttpHeadProbe::new(Some("example.com/".into()), TIMEOUT).unwrap();
        assert_eq!(
            dirs.url_for(&Target::Host("admin".into())).as_deref(),
            Some("http://example.com/admin")
        );
        assert_eq!(dirs.url_for(&Target::Port(80)), None);

        let hosts = HttpHeadProbe::new(None, TIMEOUT).unwrap();
        assert_eq!(
            hosts.url_for(&Target::Host("https://example.com".into())).as_deref(),
            Some("https://example.com/")
        );
        assert_eq!(
            hosts.url_for(&Target::Ip("::1".parse().unwrap())).as_deref(),
            Some("http://[::1]/")
        );
    }

    #[tokio::test]
    async fn success_status_is_reachable() {
        let port = serve("200 OK").await;
        let probe = HttpHeadProbe::new(Some(format!("http://127.0.0.1:{port}")), TIMEOUT).unwrap();

        let result = probe.probe(&Target::Host("admin".into()), TIMEOUT).await;

        assert!(result.reachable, "unexpected failure: {result:?}");
        assert_eq!(result.detail.as_deref(), Some("200"));
    }

    #[tokio::test]
    async fn redirect_is_reachable_and_not_followed() {
        let port = serve("301 Moved Permanently").await;
        let probe = HttpHeadProbe::new(Some(format!("http://127.0.0.1:{port}")), TIMEOUT).unwrap();

        let result = probe.probe(&Target::Host("old".into()), TIMEOUT).await;

        assert!(result.reachable);
        assert_eq!(result.detail.as_deref(), Some("301"));
    }

    #[tokio::test]
    async fn not_found_is_an_http_status_error() {
        let port = serve("404 Not Found").await;
        let probe = HttpHeadProbe::new(Some(format!("http://127.0.0.1:{port}")), TIMEOUT).unwrap();

        let result = probe.probe(&Target::Host("missing".into()), TIMEOUT).await;

        assert!(!result.reachable);
        assert_eq!(result.error, Some(ErrorKind::HttpStatus(404)));
    }

    #[tokio::test]
    async fn closed_port_is_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let probe = HttpHeadProbe::new(Some(format!("http://127.0.0.1:{port}")), TIMEOUT).unwrap();
        let result = probe.probe(&Target::Host("admin".into()), TIMEOUT).await;

        assert_eq!(result.error, Some(ErrorKind::ConnectionRefused));
    }
}
