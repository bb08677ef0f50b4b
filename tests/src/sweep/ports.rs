#![cfg(test)]
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use sweepr_common::network::target::{Target, TargetSet};
use sweepr_common::probe::ErrorKind;
use sweepr_common::run::{CancelSignal, RunConfig, RunSummary};
use sweepr_core::report::SilentReporter;
use sweepr_core::scanner;
use sweepr_protocols::TcpConnectProbe;
use tokio::net::TcpListener;

const LOOPBACK: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

async fn closed_ports(n: usize) -> Vec<u16> {
    let mut listeners = Vec::new();
    for _ in 0..n {
        listeners.push(TcpListener::bind("127.0.0.1:0").await.unwrap());
    }
    listeners
        .iter()
        .map(|listener| listener.local_addr().unwrap().port())
        .collect()
}

async fn sweep(probe: TcpConnectProbe, targets: TargetSet, concurrency: usize) -> RunSummary {
    let config = RunConfig::new(targets, concurrency, Duration::from_secs(1)).unwrap();
    scanner::run(config, Arc::new(probe), &mut SilentReporter, &CancelSignal::new()).await
}

/// A host with nothing listening: every port is refused, nothing is found.
#[tokio::test]
async fn closed_host_reports_every_port_refused() {
    let ports = closed_ports(4).await;
    let targets: TargetSet = ports.iter().copied().map(Target::Port).collect();

    let summary = sweep(TcpConnectProbe::ports_on(LOOPBACK), targets, 2).await;

    assert!(summary.is_complete());
    assert_eq!(summary.completed(), 4);
    assert!(summary.reachable.is_empty());
    for port in ports {
        assert_eq!(
            summary.error_for(&Target::Port(port)),
            Some(ErrorKind::ConnectionRefused)
        );
    }
}

#[tokio::test]
async fn open_ports_are_found_in_enumeration_order() {
    let open_a = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let open_b = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let closed = closed_ports(2).await;

    let a = open_a.local_addr().unwrap().port();
    let b = open_b.local_addr().unwrap().port();
    let targets: TargetSet = [closed[0], b, closed[1], a]
        .into_iter()
        .map(Target::Port)
        .collect();

    let summary = sweep(TcpConnectProbe::ports_on(LOOPBACK), targets, 4).await;

    assert_eq!(summary.reachable, vec![Target::Port(b), Target::Port(a)]);
    assert_eq!(summary.errors.len(), 2);
}

#[tokio::test]
async fn port_range_is_probed_once_per_port() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let start = port.saturating_sub(5).max(1);
    let targets = TargetSet::parse(&format!("{start}-{port}")).unwrap();
    let expected = targets.len();

    let summary = sweep(TcpConnectProbe::ports_on(LOOPBACK), targets, 3).await;

    assert_eq!(summary.completed(), expected);
    assert!(summary.reachable.contains(&Target::Port(port)));
    let indices: Vec<usize> = summary.results.iter().map(|result| result.index).collect();
    assert_eq!(indices, (0..expected).collect::<Vec<_>>());
}

/// Handshake discovery counts a refused connection as a live host.
#[tokio::test]
async fn handshake_finds_loopback_hosts() {
    let port = closed_ports(1).await[0];
    let targets = TargetSet::parse("127.0.0.1-3").unwrap();

    let summary = sweep(TcpConnectProbe::handshake(port), targets, 10).await;

    assert_eq!(summary.reachable.len(), 3);
    assert!(summary.found().all(|result| result.detail.as_deref() == Some("refused")));
}
