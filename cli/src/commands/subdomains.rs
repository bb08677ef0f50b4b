use sweepr_common::config::Config;
use sweepr_common::probe::ProbeKind;
use sweepr_common::run::{CancelSignal, RunSummary};
use sweepr_core::probes::ProbeOptions;

use crate::commands::{RunArgs, WordArgs, sweep};
use crate::terminal::print;

pub const DEFAULT_WORDS: &[&str] = &[
    "www", "mail", "ftp", "localhost", "webmail", "smtp", "pop", "ns", "admin", "test", "portal",
    "api", "dev", "staging",
];

pub async fn subdomains(
    domain: String,
    words: &WordArgs,
    run: &RunArgs,
    cfg: &Config,
    cancel: &CancelSignal,
) -> anyhow::Result<RunSummary> {
    let targets = words.targets(DEFAULT_WORDS)?;

    print::header(&format!("subdomains of {domain}"), cfg.quiet);

    let mut options = ProbeOptions::new(ProbeKind::Dns);
    options.domain = Some(domain);

    sweep(targets, options, run, cfg, cancel).await
}
