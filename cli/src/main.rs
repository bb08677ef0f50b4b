mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, dirs, hosts, ports, probe, subdomains};
use sweepr_common::config::Config;
use sweepr_common::run::{CancelSignal, RunSummary};
use terminal::print;
use tracing::{error, warn};

use crate::terminal::spinner;

/// Exit status of a run cancelled before anything completed.
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    spinner::init_logging();

    let cfg = Config {
        no_banner: commands.no_banner,
        quiet: commands.quiet,
    };
    print::banner(cfg.no_banner, cfg.quiet);

    let cancel = CancelSignal::new();
    listen_for_interrupt(cancel.clone());

    let outcome = match commands.command {
        Commands::Ports { host, ports, run } => {
            ports::ports(host, ports, &run, &cfg, &cancel).await
        }
        Commands::Hosts {
            targets,
            method,
            port,
            run,
        } => hosts::hosts(targets, method, port, &run, &cfg, &cancel).await,
        Commands::Subdomains { domain, words, run } => {
            subdomains::subdomains(domain, &words, &run, &cfg, &cancel).await
        }
        Commands::Dirs { url, words, run } => dirs::dirs(url, &words, &run, &cfg, &cancel).await,
        Commands::Probe {
            targets,
            kind,
            host,
            port,
            domain,
            url,
            run,
        } => {
            let args = probe::ProbeArgs {
                kind: kind.into(),
                host,
                port,
                domain,
                url,
            };
            probe::probe(targets, args, &run, &cfg, &cancel).await
        }
    };

    match outcome {
        Ok(summary) => ExitCode::from(exit_status(&summary)),
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// First Ctrl-C stops dispatching new probes; a second one exits at once.
fn listen_for_interrupt(cancel: CancelSignal) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("interrupted, waiting for probes in flight (Ctrl-C again to abort)");
        cancel.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(i32::from(EXIT_INTERRUPTED));
        }
    });
}

fn exit_status(summary: &RunSummary) -> u8 {
    if summary.cancelled && summary.completed() == 0 {
        EXIT_INTERRUPTED
    } else {
        0
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
