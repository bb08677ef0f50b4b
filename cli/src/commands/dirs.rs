use sweepr_common::config::Config;
use sweepr_common::probe::ProbeKind;
use sweepr_common::run::{CancelSignal, RunSummary};
use sweepr_core::probes::ProbeOptions;

use crate::commands::{RunArgs, WordArgs, sweep};
use crate::terminal::print;

pub const DEFAULT_WORDS: &[&str] = &[
    "admin", "backup", "config", "wp-admin", "api", "test", "debug", "upload", "files", "doc",
    "public",
];

pub async fn dirs(
    url: String,
    words: &WordArgs,
    run: &RunArgs,
    cfg: &Config,
    cancel: &CancelSignal,
) -> anyhow::Result<RunSummary> {
    let targets = words.targets(DEFAULT_WORDS)?;

    print::header(&format!("paths below {url}"), cfg.quiet);

    let mut options = ProbeOptions::new(ProbeKind::Http);
    options.base_url = Some(url);

    sweep(targets, options, run, cfg, cancel).await
}
