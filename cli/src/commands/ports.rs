use sweepr_common::SweeprError;
use sweepr_common::config::Config;
use sweepr_common::network::target::{Target, TargetSet};
use sweepr_common::probe::ProbeKind;
use sweepr_common::run::{CancelSignal, RunSummary};
use sweepr_core::probes::ProbeOptions;

use crate::commands::{RunArgs, sweep};
use crate::terminal::print;

pub const DEFAULT_PORTS: &str = "80,443,22,21,3306,5432";

pub async fn ports(
    host: String,
    ports: String,
    run: &RunArgs,
    cfg: &Config,
    cancel: &CancelSignal,
) -> anyhow::Result<RunSummary> {
    let targets = TargetSet::parse(&ports)?;
    if let Some(other) = targets.iter().find(|target| !matches!(target, Target::Port(_))) {
        return Err(SweeprError::invalid(other.to_string(), "expected a port or port range").into());
    }

    print::header(&format!("scanning {host}"), cfg.quiet);

    let mut options = ProbeOptions::new(ProbeKind::Tcp);
    options.host = Some(host);

    sweep(targets, options, run, cfg, cancel).await
}
