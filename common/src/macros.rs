//! Logging shorthands that tag events so the terminal formatter can pick
//! the right symbol.

/// Logs a positive outcome (`[+]` in the terminal).
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "sweepr::success", $($arg)*)
    };
}

/// Logs a neutral status line (`[*]` in the terminal).
#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "sweepr::status", $($arg)*)
    };
}
