//! Maps low-level failures onto [`ErrorKind`].

use std::error::Error;
use std::io;

use sweepr_common::probe::ErrorKind;

pub fn io_error_kind(err: &io::Error) -> ErrorKind {
    match err.kind() {
        io::ErrorKind::ConnectionRefused => ErrorKind::ConnectionRefused,
        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
            ErrorKind::ConnectionReset
        }
        io::ErrorKind::TimedOut => ErrorKind::Timeout,
        io::ErrorKind::HostUnreachable => ErrorKind::HostUnreachable,
        io::ErrorKind::NetworkUnreachable => ErrorKind::NetworkUnreachable,
        io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
        _ => ErrorKind::Other,
    }
}

/// Walks an error's `source()` chain looking for something classifiable.
///
/// Resolver failures are matched on their message since HTTP clients wrap
/// them in opaque types.
pub fn error_chain_kind(err: &(dyn Error + 'static)) -> ErrorKind {
    let mut current: Option<&(dyn Error + 'static)> = Some(err);

    while let Some(layer) = current {
        if layer.to_string().contains("dns error") {
            return ErrorKind::ResolutionFailed;
        }
        if let Some(io_err) = layer.downcast_ref::<io::Error>() {
            return io_error_kind(io_err);
        }
        current = layer.source();
    }

    ErrorKind::Other
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
