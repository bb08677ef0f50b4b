use colored::*;
use sweepr_common::config::Config;
use sweepr_common::probe::{ProbeKind, ProbeResult};
use sweepr_common::run::RunSummary;
use sweepr_common::{status, success};
use sweepr_core::report::{Progress, Reporter};
use tracing::{Span, warn};

use crate::mprint;
use crate::terminal::{colors, print, spinner};

type Detail = (String, ColoredString);

/// Streams a run to the terminal: found lines as they arrive, a status
/// line every few completions and the grouped summary at the end.
pub struct TerminalReporter {
    cfg: Config,
    kind: ProbeKind,
    span: Span,
}

impl TerminalReporter {
    pub fn new(cfg: Config, kind: ProbeKind, span: Span) -> Self {
        Self { cfg, kind, span }
    }
}

impl Reporter for TerminalReporter {
    fn on_start(&mut self, total: usize, workers: usize) {
        spinner::start_progress(&self.span, total);
        if self.cfg.quiet == 0 {
            status!("{} probing {total} targets with {workers} workers", self.kind);
        }
    }

    fn on_result(&mut self, result: &ProbeResult, progress: &Progress) {
        spinner::advance(&self.span);
        if !result.reachable {
            return;
        }

        spinner::report_found(&self.span, progress.reachable);
        if self.cfg.quiet < 2 {
            success!("{}", found_line(result));
        }
    }

    fn on_progress(&mut self, progress: &Progress) {
        if self.cfg.quiet == 0 {
            status!(
                "{}/{} probed ({:.0}%), {} found",
                progress.completed,
                progress.total,
                progress.percent(),
                progress.reachable
            );
        }
    }

    fn on_finish(&mut self, summary: &RunSummary) {
        if !summary.is_complete() {
            warn!(
                "run cancelled after {}/{} targets, results are incomplete",
                summary.completed(),
                summary.total
            );
        }

        if self.cfg.quiet == 0 {
            print_results(summary, self.kind);
            if summary.reachable.is_empty() {
                print::no_results();
            }
        }

        print_totals(summary, &self.cfg);
    }
}

fn found_line(result: &ProbeResult) -> String {
    let latency = format!("{}ms", result.latency.as_millis()).color(colors::SEPARATOR);
    match &result.detail {
        Some(detail) => format!(
            "{} {} {}",
            result.target.to_string().color(colors::PRIMARY).bold(),
            detail.color(colors::TEXT_DEFAULT),
            latency
        ),
        None => format!("{} {}", result.target.to_string().color(colors::PRIMARY).bold(), latency),
    }
}

fn print_results(summary: &RunSummary, kind: ProbeKind) {
    print::header(&format!("{kind} results"), 0);

    let found: Vec<Detail> = summary
        .found()
        .map(|result| {
            let value = match &result.detail {
                Some(detail) => format!("{detail} ({}ms)", result.latency.as_millis()),
                None => format!("{}ms", result.latency.as_millis()),
            };
            (result.target.to_string(), value.color(colors::FOUND))
        })
        .collect();

    if !found.is_empty() {
        print::tree_head("+", &format!("{} reachable", found.len()));
        print::as_tree_one_level(&found);
    }

    for (kind, targets) in summary.errors_by_kind() {
        if !found.is_empty() {
            mprint!();
        }
        print::tree_head("-", &format!("{kind} ({})", targets.len()));
        let names: Vec<String> = targets.iter().map(|target| target.to_string()).collect();
        let listed: ColoredString = names.join(", ").color(colors::FAILED);
        print::as_tree_one_level(&[("targets".to_string(), listed)]);
    }
}

fn print_totals(summary: &RunSummary, cfg: &Config) {
    let found: ColoredString = format!("{} reachable", summary.reachable.len()).bold().green();
    let failed: ColoredString = format!("{} failed", summary.errors.len()).bold().red();
    let total_time: ColoredString =
        format!("{:.2}s", summary.elapsed.as_secs_f64()).bold().yellow();
    let verb = if summary.is_complete() { "Sweep Complete" } else { "Sweep Incomplete" };
    let output: String = format!(
        "{verb}: {found}, {failed} of {} in {total_time}",
        summary.total
    )
    .color(colors::TEXT_DEFAULT)
    .to_string();

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => success!("{}", output),
    }
}
