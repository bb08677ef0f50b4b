use clap::ValueEnum;
use sweepr_common::config::Config;
use sweepr_common::network::target::TargetSet;
use sweepr_common::probe::ProbeKind;
use sweepr_common::run::{CancelSignal, RunSummary};
use sweepr_core::probes::ProbeOptions;

use crate::commands::{RunArgs, sweep};
use crate::terminal::print;

pub const DEFAULT_PORT: u16 = 443;

/// How liveness is decided.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// ICMP echo request
    Icmp,
    /// TCP handshake; a refused connection still means the host is up
    Tcp,
}

pub async fn hosts(
    targets: String,
    method: Method,
    port: u16,
    run: &RunArgs,
    cfg: &Config,
    cancel: &CancelSignal,
) -> anyhow::Result<RunSummary> {
    let targets = TargetSet::parse(&targets)?;

    print::header("host discovery", cfg.quiet);

    let options = match method {
        Method::Icmp => ProbeOptions::new(ProbeKind::Icmp),
        Method::Tcp => {
            let mut options = ProbeOptions::new(ProbeKind::Tcp);
            options.port = Some(port);
            options.handshake = true;
            options
        }
    };

    sweep(targets, options, run, cfg, cancel).await
}
