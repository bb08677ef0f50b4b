use sweepr_common::config::Config;
use sweepr_common::network::target::TargetSet;
use sweepr_common::probe::ProbeKind;
use sweepr_common::run::{CancelSignal, RunSummary};
use sweepr_core::probes::ProbeOptions;

use crate::commands::{RunArgs, sweep};
use crate::terminal::print;

/// Everything `sweepr probe` was given besides the targets.
pub struct ProbeArgs {
    pub kind: ProbeKind,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub domain: Option<String>,
    pub url: Option<String>,
}

pub async fn probe(
    targets: String,
    args: ProbeArgs,
    run: &RunArgs,
    cfg: &Config,
    cancel: &CancelSignal,
) -> anyhow::Result<RunSummary> {
    // Below a domain or URL every entry is a word, even one containing '/'.
    let targets = if args.domain.is_some() || args.url.is_some() {
        TargetSet::from_words(targets.split(','))?
    } else {
        TargetSet::parse(&targets)?
    };

    print::header(&format!("{} probe", args.kind), cfg.quiet);

    let mut options = ProbeOptions::new(args.kind);
    options.host = args.host;
    options.port = args.port;
    options.domain = args.domain;
    options.base_url = args.url;

    sweep(targets, options, run, cfg, cancel).await
}
