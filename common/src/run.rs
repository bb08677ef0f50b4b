//! # Run Model
//!
//! Configuration going into a run and the summary coming out of it.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::error::{Result, SweeprError};
use crate::network::target::{Target, TargetSet};
use crate::probe::{ErrorKind, ProbeResult};

/// How many completions pass between two progress reports by default.
pub const DEFAULT_PROGRESS_EVERY: usize = 10;

/// Validated, immutable input of a run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    targets: TargetSet,
    concurrency: usize,
    per_probe_timeout: Duration,
    progress_every: usize,
}

impl RunConfig {
    pub fn new(
        targets: TargetSet,
        concurrency: usize,
        per_probe_timeout: Duration,
    ) -> Result<Self> {
        if concurrency == 0 {
            return Err(SweeprError::invalid(
                concurrency.to_string(),
                "concurrency must be at least 1",
            ));
        }
        if per_probe_timeout.is_zero() {
            return Err(SweeprError::invalid(
                format!("{per_probe_timeout:?}"),
                "probe timeout must be greater than zero",
            ));
        }

        Ok(Self {
            targets,
            concurrency,
            per_probe_timeout,
            progress_every: DEFAULT_PROGRESS_EVERY,
        })
    }

    pub fn progress_every(mut self, every: usize) -> Result<Self> {
        if every == 0 {
            return Err(SweeprError::invalid("0", "progress interval must be at least 1"));
        }
        self.progress_every = every;
        Ok(self)
    }

    pub fn targets(&self) -> &TargetSet {
        &self.targets
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn per_probe_timeout(&self) -> Duration {
        self.per_probe_timeout
    }

    pub fn progress_interval(&self) -> usize {
        self.progress_every
    }

    pub fn into_targets(self) -> TargetSet {
        self.targets
    }
}

/// Cooperative, run-wide cancellation flag.
///
/// Workers check it before claiming a new target; probes already in flight
/// are left to finish or time out.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    flag: Arc<AtomicBool>,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Final, read-only account of a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Number of enumerated targets.
    pub total: usize,
    /// Every recorded result, in enumeration order.
    pub results: Vec<ProbeResult>,
    /// Reachable targets, in enumeration order.
    pub reachable: Vec<Target>,
    /// Failed targets and why, in enumeration order.
    pub errors: Vec<(Target, ErrorKind)>,
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn builder(total: usize) -> SummaryBuilder {
        SummaryBuilder {
            total,
            results: Vec::new(),
        }
    }

    /// Number of targets that produced a result.
    pub fn completed(&self) -> usize {
        self.results.len()
    }

    /// `true` when every enumerated target was probed.
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.completed() == self.total
    }

    pub fn error_for(&self, target: &Target) -> Option<ErrorKind> {
        self.errors
            .iter()
            .find(|(failed, _)| failed == target)
            .map(|(_, kind)| *kind)
    }

    /// Failures grouped by kind, targets kept in enumeration order.
    pub fn errors_by_kind(&self) -> BTreeMap<ErrorKind, Vec<&Target>> {
        let mut grouped: BTreeMap<ErrorKind, Vec<&Target>> = BTreeMap::new();
        for (target, kind) in &self.errors {
            grouped.entry(*kind).or_default().push(target);
        }
        grouped
    }

    /// Results of reachable targets, in enumeration order.
    pub fn found(&self) -> impl Iterator<Item = &ProbeResult> {
        self.results.iter().filter(|result| result.reachable)
    }
}

/// Accumulates results as they arrive, in completion order.
#[derive(Debug)]
pub struct SummaryBuilder {
    total: usize,
    results: Vec<ProbeResult>,
}

impl SummaryBuilder {
    pub fn record(&mut self, result: ProbeResult) {
        self.results.push(result);
    }

    /// Restores enumeration order and derives the reachable and error views.
    pub fn finish(mut self, cancelled: bool, elapsed: Duration) -> RunSummary {
        self.results.sort_by_key(|result| result.index);

        let reachable: Vec<Target> = self
            .results
            .iter()
            .filter(|result| result.reachable)
            .map(|result| result.target.clone())
            .collect();

        let errors: Vec<(Target, ErrorKind)> = self
            .results
            .iter()
            .filter(|result| !result.reachable)
            .map(|result| {
                let kind = result.error.unwrap_or(ErrorKind::Other);
                (result.target.clone(), kind)
            })
            .collect();

        RunSummary {
            total: self.total,
            results: self.results,
            reachable,
            errors,
            cancelled,
            elapsed,
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
