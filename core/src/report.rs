//! Result reporting.
//!
//! The runner pushes every result through a [`Reporter`] the moment it
//! arrives. [`write_summary`] renders a finished run as plain text for
//! files and pipes.

use std::io::{self, Write};
use std::time::Duration;

use sweepr_common::probe::ProbeResult;
use sweepr_common::run::RunSummary;
use tokio::time::Instant;

/// Running counters, updated by the runner before each callback.
#[derive(Debug, Clone)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
    pub reachable: usize,
    pub failed: usize,
    started: Instant,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            reachable: 0,
            failed: 0,
            started: Instant::now(),
        }
    }

    pub fn record(&mut self, result: &ProbeResult) {
        self.completed += 1;
        if result.reachable {
            self.reachable += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 * 100.0 / self.total as f64
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Receives results while a run is in progress.
///
/// Called from the collector only, never concurrently.
pub trait Reporter: Send {
    fn on_start(&mut self, _total: usize, _workers: usize) {}

    fn on_result(&mut self, result: &ProbeResult, progress: &Progress);

    fn on_progress(&mut self, _progress: &Progress) {}

    fn on_finish(&mut self, _summary: &RunSummary) {}
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn on_result(&mut self, _result: &ProbeResult, _progress: &Progress) {}
}

/// Writes the final summary: status, counts, reachable targets and
/// failures grouped by kind.
pub fn write_summary<W: Write>(w: &mut W, summary: &RunSummary) -> io::Result<()> {
    let status = if summary.is_complete() {
        "complete"
    } else {
        "incomplete"
    };

    writeln!(w, "status:    {status}")?;
    writeln!(w, "probed:    {}/{}", summary.completed(), summary.total)?;
    writeln!(w, "reachable: {}", summary.reachable.len())?;
    writeln!(w, "failed:    {}", summary.errors.len())?;
    writeln!(w, "elapsed:   {:.2}s", summary.elapsed.as_secs_f64())?;

    if !summary.is_complete() {
        let skipped = summary.total.saturating_sub(summary.completed());
        writeln!(w, "note:      run was cancelled, {skipped} targets not probed")?;
    }

    writeln!(w)?;
    writeln!(w, "[reachable]")?;
    for result in summary.found() {
        write!(w, "{} ({}ms)", result.target, result.latency.as_millis())?;
        match &result.detail {
            Some(detail) => writeln!(w, " {detail}")?,
            None => writeln!(w)?,
        }
    }

    for (kind, targets) in summary.errors_by_kind() {
        writeln!(w)?;
        writeln!(w, "[{kind}] {}", targets.len())?;
        for target in targets {
            writeln!(w, "{target}")?;
        }
    }

    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
