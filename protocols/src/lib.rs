//! Probe variants for `sweepr`.
//!
//! Every probe here applies its own timeout and folds every failure into a
//! [`sweepr_common::probe::ProbeResult`]; none of them return errors.

pub mod classify;
pub mod dns;
pub mod http;
pub mod icmp;
pub mod lookup;
pub mod services;
pub mod tcp;

pub use dns::DnsProbe;
pub use http::HttpHeadProbe;
pub use icmp::IcmpProbe;
pub use tcp::TcpConnectProbe;
