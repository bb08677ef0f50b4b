use colored::*;
use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::IndicatifLayer;
use tracing_indicatif::span_ext::IndicatifSpanExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::terminal::logging::{PRINT_TARGET, SweeprFormatter, is_output_target};

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Installs the global subscriber. Log lines are written above the
/// progress bars instead of through them; results go to stdout and
/// diagnostics to stderr.
///
/// `RUST_LOG` overrides the default `info` level; terminal output itself
/// always passes.
pub fn init_logging() {
    let indicatif_layer = IndicatifLayer::new();

    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Ok(directive) = format!("{PRINT_TARGET}=info").parse() {
        filter = filter.add_directive(directive);
    }

    let output_layer = tracing_subscriber::fmt::layer()
        .event_format(SweeprFormatter)
        .with_writer(indicatif_layer.get_stdout_writer())
        .with_filter(filter_fn(|meta| is_output_target(meta.target())));

    let diagnostics_layer = tracing_subscriber::fmt::layer()
        .event_format(SweeprFormatter)
        .with_writer(indicatif_layer.get_stderr_writer())
        .with_filter(filter_fn(|meta| !is_output_target(meta.target())));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(output_layer)
        .with(diagnostics_layer)
        .with(indicatif_layer)
        .try_init();
}

/// Turns the run's span into a progress bar over `total` targets.
pub fn start_progress(span: &Span, total: usize) {
    let template = "{spinner:.blue} {bar:32.green/white} {pos}/{len} {msg}";
    let style = ProgressStyle::with_template(template)
        .map(|style| style.tick_strings(TICKS))
        .unwrap_or_else(|_| ProgressStyle::default_bar());

    span.pb_set_style(&style);
    span.pb_set_length(total as u64);
}

pub fn advance(span: &Span) {
    span.pb_inc(1);
}

pub fn report_found(span: &Span, found: usize) {
    span.pb_set_message(&format!(
        "{} so far",
        format!("{found} found").green().bold()
    ));
}
