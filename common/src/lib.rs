//! Shared model for `sweepr`: what gets probed, how a probe reports back,
//! and how a run is configured and summarised.

pub mod config;
pub mod error;
pub mod macros;
pub mod network;
pub mod probe;
pub mod run;

pub use error::SweeprError;

#[doc(hidden)]
pub use tracing as __tracing;
