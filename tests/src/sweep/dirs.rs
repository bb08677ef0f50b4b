#![cfg(test)]
use std::sync::Arc;
use std::time::Duration;

use sweepr_common::network::target::{Target, TargetSet};
use sweepr_common::probe::ErrorKind;
use sweepr_common::run::{CancelSignal, RunConfig};
use sweepr_core::report::{SilentReporter, write_summary};
use sweepr_core::scanner;
use sweepr_protocols::HttpHeadProbe;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves `200` for `/admin`, `404` for everything else.
async fn site() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 2048];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let status = if request.starts_with("HEAD /admin ") {
                    "200 OK"
                } else {
                    "404 Not Found"
                };
                let response =
                    format!("HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
                let _ = socket.write_all(response.as_bytes()).await;
            });
        }
    });

    format!("http://127.0.0.1:{port}")
}

#[tokio::test]
async fn directory_sweep_finds_existing_paths() {
    let base = site().await;
    let targets = TargetSet::from_words(["backup", "admin", "config"]).unwrap();
    let probe = HttpHeadProbe::new(Some(base), Duration::from_secs(2)).unwrap();
    let config = RunConfig::new(targets, 2, Duration::from_secs(2)).unwrap();

    let summary =
        scanner::run(config, Arc::new(probe), &mut SilentReporter, &CancelSignal::new()).await;

    assert_eq!(summary.reachable, vec![Target::Host("admin".into())]);
    assert_eq!(
        summary.error_for(&Target::Host("backup".into())),
        Some(ErrorKind::HttpStatus(404))
    );

    let mut report = Vec::new();
    write_summary(&mut report, &summary).unwrap();
    let report = String::from_utf8(report).unwrap();
    assert!(report.contains("status:    complete"));
    assert!(report.contains("[http-status(404)] 2"));
}
