pub mod dirs;
pub mod hosts;
pub mod ports;
pub mod probe;
pub mod subdomains;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use sweepr_common::SweeprError;
use sweepr_common::config::Config;
use sweepr_common::network::target::TargetSet;
use sweepr_common::probe::{DEFAULT_CONCURRENCY, ProbeKind};
use sweepr_common::run::{CancelSignal, DEFAULT_PROGRESS_EVERY, RunConfig, RunSummary};
use sweepr_common::success;
use sweepr_core::probes::{ProbeOptions, build_probe};
use sweepr_core::report::write_summary;
use sweepr_core::scanner;
use tracing::{Instrument, debug, info_span};

use crate::terminal::reporter::TerminalReporter;

#[derive(Parser)]
#[command(name = "sweepr")]
#[command(version)]
#[command(about = "Concurrent reachability sweeps: ports, hosts, subdomains and paths.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Less output; repeat for even less
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Do not print the banner
    #[arg(long, global = true)]
    pub no_banner: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan TCP ports on a host
    #[command(alias = "p")]
    Ports {
        host: String,
        /// Ports and ranges, e.g. `22,80,8000-8100`
        #[arg(default_value = ports::DEFAULT_PORTS)]
        ports: String,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Find live hosts among addresses, ranges or CIDR blocks
    #[command(alias = "h")]
    Hosts {
        targets: String,
        #[arg(short, long, value_enum, default_value_t = hosts::Method::Icmp)]
        method: hosts::Method,
        /// Port used by the `tcp` method
        #[arg(short, long, default_value_t = hosts::DEFAULT_PORT)]
        port: u16,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Enumerate subdomains of a domain
    #[command(alias = "sd")]
    Subdomains {
        domain: String,
        #[command(flatten)]
        words: WordArgs,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Look for paths below a URL
    #[command(alias = "d")]
    Dirs {
        url: String,
        #[command(flatten)]
        words: WordArgs,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Run any probe over any target set
    Probe {
        targets: String,
        #[arg(short, long, value_enum)]
        kind: KindArg,
        /// Host whose ports are probed (tcp with port targets)
        #[arg(long)]
        host: Option<String>,
        /// Port for tcp probes against hosts or addresses
        #[arg(long)]
        port: Option<u16>,
        /// Domain appended to dns targets
        #[arg(long)]
        domain: Option<String>,
        /// Base URL for http targets
        #[arg(long)]
        url: Option<String>,
        #[command(flatten)]
        run: RunArgs,
    },
}

/// Flags every sweep understands.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Probes in flight at once
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-probe timeout in seconds (fractions allowed)
    #[arg(short, long)]
    pub timeout: Option<f64>,

    /// Print a status line every N completed probes
    #[arg(long, default_value_t = DEFAULT_PROGRESS_EVERY)]
    pub progress_every: usize,

    /// Also write the final summary to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Longest per-probe timeout accepted on the command line.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(3600);

impl RunArgs {
    /// The requested timeout, or the probe's default.
    pub fn timeout_for(&self, kind: ProbeKind) -> Result<Duration, SweeprError> {
        let Some(secs) = self.timeout else {
            return Ok(kind.default_timeout());
        };

        let timeout = Duration::try_from_secs_f64(secs).map_err(|_| {
            SweeprError::invalid(secs.to_string(), "timeout must be a positive number of seconds")
        })?;
        if timeout.is_zero() {
            return Err(SweeprError::invalid(secs.to_string(), "timeout must be greater than zero"));
        }
        if timeout > MAX_TIMEOUT {
            return Err(SweeprError::invalid(
                secs.to_string(),
                format!("timeout may not exceed {}s", MAX_TIMEOUT.as_secs()),
            ));
        }
        Ok(timeout)
    }
}

/// Wordlist sources. A file wins over `-w`, which wins over the built-in list.
#[derive(Args, Debug, Clone)]
pub struct WordArgs {
    /// Comma separated words
    #[arg(short, long)]
    pub words: Option<String>,

    /// File with one word per line
    #[arg(long)]
    pub wordlist: Option<PathBuf>,
}

impl WordArgs {
    pub fn targets(&self, defaults: &[&str]) -> anyhow::Result<TargetSet> {
        if let Some(path) = &self.wordlist {
            return Ok(TargetSet::from_words(read_wordlist(path)?.lines())?);
        }
        if let Some(words) = &self.words {
            return Ok(TargetSet::from_words(words.split(','))?);
        }
        Ok(TargetSet::from_words(defaults)?)
    }
}

fn read_wordlist(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading wordlist {}", path.display()))
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum KindArg {
    Tcp,
    Icmp,
    Dns,
    Http,
}

impl From<KindArg> for ProbeKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Tcp => ProbeKind::Tcp,
            KindArg::Icmp => ProbeKind::Icmp,
            KindArg::Dns => ProbeKind::Dns,
            KindArg::Http => ProbeKind::Http,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Validates the run, drives the runner with a terminal reporter and
/// writes the `--output` file.
pub async fn sweep(
    targets: TargetSet,
    mut options: ProbeOptions,
    run: &RunArgs,
    cfg: &Config,
    cancel: &CancelSignal,
) -> anyhow::Result<RunSummary> {
    options.timeout = run.timeout_for(options.kind)?;
    options.validate_against(&targets)?;

    let config = RunConfig::new(targets, run.concurrency, options.timeout)?
        .progress_every(run.progress_every)?;
    let probe = build_probe(&options).await?;
    debug!("{options:?}");

    let span = info_span!("sweep", indicatif.pb_show = true);
    let mut reporter = TerminalReporter::new(cfg.clone(), options.kind, span.clone());
    let summary = scanner::run(config, probe, &mut reporter, cancel)
        .instrument(span)
        .await;

    if let Some(path) = &run.output {
        let mut file = fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        write_summary(&mut file, &summary)
            .with_context(|| format!("writing {}", path.display()))?;
        success!("summary written to {}", path.display());
    }

    Ok(summary)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use sweepr_common::network::target::Target;

    fn run_args(timeout: Option<f64>) -> RunArgs {
        RunArgs {
            concurrency: DEFAULT_CONCURRENCY,
            timeout,
            progress_every: DEFAULT_PROGRESS_EVERY,
            output: None,
        }
    }

    fn hosts(set: &TargetSet) -> Vec<Target> {
        set.iter().collect()
    }

    #[test]
    fn fractional_timeout_is_accepted() {
        let timeout = run_args(Some(0.25)).timeout_for(ProbeKind::Tcp).unwrap();
        assert_eq!(timeout, Duration::from_millis(250));
    }

    #[test]
    fn missing_timeout_uses_kind_default() {
        let timeout = run_args(None).timeout_for(ProbeKind::Http).unwrap();
        assert_eq!(timeout, ProbeKind::Http.default_timeout());
    }

    #[test]
    fn unusable_timeouts_are_rejected() {
        for secs in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e19, 3600.5] {
            let err = run_args(Some(secs)).timeout_for(ProbeKind::Tcp).unwrap_err();
            assert!(err.is_invalid_specification(), "{secs} was accepted");
        }
        assert!(run_args(Some(3600.0)).timeout_for(ProbeKind::Tcp).is_ok());
    }

    #[test]
    fn builtin_words_are_the_fallback() {
        let words = WordArgs { words: None, wordlist: None };
        let set = words.targets(&["www", "mail"]).unwrap();
        assert_eq!(hosts(&set), vec![Target::Host("www".into()), Target::Host("mail".into())]);
    }

    #[test]
    fn inline_words_beat_builtin_words() {
        let words = WordArgs { words: Some("api,dev".into()), wordlist: None };
        let set = words.targets(&["www"]).unwrap();
        assert_eq!(hosts(&set), vec![Target::Host("api".into()), Target::Host("dev".into())]);
    }

    #[test]
    fn wordlist_file_beats_inline_words() {
        let path = std::env::temp_dir().join(format!("sweepr-words-{}.txt", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "# staging hosts\nstaging\n\nbeta").unwrap();
        drop(file);

        let words = WordArgs { words: Some("api".into()), wordlist: Some(path.clone()) };
        let set = words.targets(&["www"]).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(
            hosts(&set),
            vec![Target::Host("staging".into()), Target::Host("beta".into())]
        );
    }

    #[test]
    fn missing_wordlist_file_is_an_error() {
        let words = WordArgs {
            words: None,
            wordlist: Some(PathBuf::from("/nonexistent/sweepr/words.txt")),
        };
        assert!(words.targets(&["www"]).is_err());
    }
}
