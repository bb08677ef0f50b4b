//! The bounded concurrent probe runner.
//!
//! A fixed pool of `concurrency` worker tasks pulls targets from a shared
//! cursor, probes them, and sends each result to a single collector. The
//! collector feeds the [`Reporter`] as results arrive and re-sorts them into
//! enumeration order once the pool drains.
//!
//! The pool size is the backpressure: at most `concurrency` probes are ever
//! in flight, regardless of how many targets were enumerated.

use std::sync::Arc;
use std::time::Duration;

use sweepr_common::network::target::Target;
use sweepr_common::probe::{ErrorKind, Probe, ProbeResult};
use sweepr_common::run::{CancelSignal, RunConfig, RunSummary};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::report::{Progress, Reporter};

mod cursor;

use cursor::Cursor;

/// Extra time a probe gets past its own timeout before the runner gives up
/// on it and aborts the task.
pub const BACKSTOP_GRACE: Duration = Duration::from_millis(100);

/// Probes every target in `config` and returns the summary.
///
/// Probe failures never abort the run; they end up in
/// [`RunSummary::errors`]. Cancelling `cancel` stops new probes from being
/// dispatched and yields a partial summary with `cancelled` set.
pub async fn run(
    config: RunConfig,
    probe: Arc<dyn Probe>,
    reporter: &mut dyn Reporter,
    cancel: &CancelSignal,
) -> RunSummary {
    let started = Instant::now();
    let total = config.targets().len();
    let workers_count = config.concurrency().min(total);
    let timeout = config.per_probe_timeout();
    let progress_every = config.progress_interval();

    let cursor = Arc::new(Cursor::new(config.into_targets(), cancel.clone()));
    let (tx, mut rx) = mpsc::channel::<ProbeResult>(workers_count.max(1));

    debug!(
        "dispatching {total} {} probes over {workers_count} workers",
        probe.kind()
    );
    reporter.on_start(total, workers_count);

    let mut workers: JoinSet<()> = JoinSet::new();
    for _ in 0..workers_count {
        workers.spawn(worker(cursor.clone(), probe.clone(), timeout, tx.clone()));
    }
    drop(tx);

    let mut summary = RunSummary::builder(total);
    let mut progress = Progress::new(total);

    while let Some(result) = rx.recv().await {
        progress.record(&result);
        reporter.on_result(&result, &progress);
        if progress.completed % progress_every == 0 {
            reporter.on_progress(&progress);
        }
        summary.record(result);
    }

    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            warn!("worker exited abnormally: {e}");
        }
    }

    let summary = summary.finish(cursor.was_interrupted(), started.elapsed());
    reporter.on_finish(&summary);
    summary
}

async fn worker(
    cursor: Arc<Cursor>,
    probe: Arc<dyn Probe>,
    timeout: Duration,
    tx: mpsc::Sender<ProbeResult>,
) {
    while let Some((index, target)) = cursor.claim() {
        let result = probe_isolated(probe.clone(), target, timeout).await;
        if tx.send(result.with_index(index)).await.is_err() {
            break;
        }
    }
}

/// Runs one probe on its own task so that a hang or a panic only costs
/// that target.
async fn probe_isolated(
    probe: Arc<dyn Probe>,
    target: Target,
    timeout: Duration,
) -> ProbeResult {
    let started = Instant::now();
    let task_target = target.clone();
    let mut handle = tokio::spawn(async move { probe.probe(&task_target, timeout).await });

    match tokio::time::timeout(timeout + BACKSTOP_GRACE, &mut handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) if join_err.is_panic() => {
            warn!("probe for {target} panicked");
            ProbeResult::failed(target, started.elapsed(), ErrorKind::ProbePanicked)
        }
        Ok(Err(join_err)) => {
            ProbeResult::failed(target, started.elapsed(), ErrorKind::Other)
                .with_detail(join_err.to_string())
        }
        Err(_elapsed) => {
            handle.abort();
            debug!("probe for {target} ignored its timeout, aborted");
            ProbeResult::failed(target, started.elapsed(), ErrorKind::Timeout)
                .with_detail("probe did not return in time")
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
