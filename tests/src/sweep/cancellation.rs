#![cfg(test)]
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sweepr_common::network::target::{Target, TargetSet};
use sweepr_common::probe::{Probe, ProbeKind, ProbeResult};
use sweepr_common::run::{CancelSignal, RunConfig};
use sweepr_core::report::SilentReporter;
use sweepr_core::scanner;

/// Cancels the run once `after` probes have finished.
struct CancellingProbe {
    finished: AtomicUsize,
    after: usize,
    cancel: CancelSignal,
}

#[async_trait]
impl Probe for CancellingProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Tcp
    }

    async fn probe(&self, target: &Target, _timeout: Duration) -> ProbeResult {
        tokio::time::sleep(Duration::from_millis(5)).await;
        if self.finished.fetch_add(1, Ordering::SeqCst) + 1 == self.after {
            self.cancel.cancel();
        }
        ProbeResult::reachable(target.clone(), Duration::from_millis(5))
    }
}

#[tokio::test]
async fn cancelled_run_stops_within_one_pool_of_the_signal() {
    const AFTER: usize = 10;
    const CONCURRENCY: usize = 4;

    let cancel = CancelSignal::new();
    let probe = CancellingProbe {
        finished: AtomicUsize::new(0),
        after: AFTER,
        cancel: cancel.clone(),
    };
    let targets = TargetSet::parse("1-500").unwrap();
    let config = RunConfig::new(targets, CONCURRENCY, Duration::from_secs(1)).unwrap();

    let summary = scanner::run(config, Arc::new(probe), &mut SilentReporter, &cancel).await;

    assert!(summary.cancelled);
    assert!(!summary.is_complete());
    assert!(summary.completed() >= AFTER);
    assert!(
        summary.completed() <= AFTER + CONCURRENCY,
        "{} results after cancelling at {AFTER}",
        summary.completed()
    );
    let indices: Vec<usize> = summary.results.iter().map(|result| result.index).collect();
    assert_eq!(indices, (0..summary.completed()).collect::<Vec<_>>());
}
