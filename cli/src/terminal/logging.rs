use std::fmt;

use colored::*;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::registry::LookupSpan;

pub const PRINT_TARGET: &str = "sweepr::print";
const SUCCESS_TARGET: &str = "sweepr::success";
const STATUS_TARGET: &str = "sweepr::status";

/// Results, progress and summaries go to stdout; diagnostics to stderr.
pub fn is_output_target(target: &str) -> bool {
    matches!(target, PRINT_TARGET | SUCCESS_TARGET | STATUS_TARGET)
}

pub struct SweeprFormatter;

impl<S, N> FormatEvent<S, N> for SweeprFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        if meta.target() == PRINT_TARGET {
            let mut raw = RawMessage::default();
            event.record(&mut raw);
            return writeln!(writer, "{}", raw.0);
        }

        let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) =
            match (meta.target(), *meta.level()) {
                (SUCCESS_TARGET, _) => ("[+]", |s| s.green().bold()),
                (STATUS_TARGET, _) => ("[*]", |s| s.cyan().bold()),
                (_, Level::TRACE) => ("[ ]", |s| s.dimmed()),
                (_, Level::DEBUG) => ("[?]", |s| s.blue()),
                (_, Level::INFO) => ("[*]", |s| s.cyan().bold()),
                (_, Level::WARN) => ("[!]", |s| s.yellow().bold()),
                (_, Level::ERROR) => ("[-]", |s| s.red().bold()),
            };

        write!(writer, "{} ", color_func(symbol.into()))?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Pulls the `raw_msg` field out of a print event.
#[derive(Default)]
struct RawMessage(String);

impl Visit for RawMessage {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "raw_msg" {
            self.0 = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "raw_msg" {
            self.0 = format!("{value:?}");
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_and_diagnostics_are_split() {
        assert!(is_output_target(PRINT_TARGET));
        assert!(is_output_target("sweepr::success"));
        assert!(is_output_target("sweepr::status"));

        assert!(!is_output_target("sweepr_cli"));
        assert!(!is_output_target("sweepr_core::scanner"));
        assert!(!is_output_target("sweepr::printer"));
    }
}
