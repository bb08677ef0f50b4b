//! # Contiguous Ranges
//!
//! Inclusive IPv4 and port ranges. Both are random-access so the runner can
//! hand out targets by enumeration index without materialising them.

use std::net::Ipv4Addr;

use pnet::ipnetwork::Ipv4Network;

use crate::error::{Result, SweeprError};

/// Represents a continuous range of IPv4 addresses, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    /// Number of addresses in the range. Zero when `start > end`.
    pub fn len(&self) -> usize {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        if start > end {
            0
        } else {
            (end - start) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, offset: usize) -> Option<Ipv4Addr> {
        if offset >= self.len() {
            return None;
        }
        let start: u32 = self.start_addr.into();
        Some(Ipv4Addr::from(start + offset as u32))
    }
}

/// Inclusive range of TCP/UDP ports. Port `0` is never part of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
}

impl PortRange {
    pub fn new(start: u16, end: u16) -> Result<Self> {
        let input = format!("{start}-{end}");
        if start == 0 {
            return Err(SweeprError::invalid(input, "port 0 is not probeable"));
        }
        if start > end {
            return Err(SweeprError::invalid(input, "range start is above range end"));
        }
        Ok(Self { start, end })
    }

    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, offset: usize) -> Option<u16> {
        if offset >= self.len() {
            return None;
        }
        Some(self.start + offset as u16)
    }
}

/// Usable hosts of a CIDR block (e.g. `192.168.1.0/24` gives `.1` to `.254`).
///
/// Network and broadcast addresses are stripped for prefixes up to /30;
/// /31 and /32 keep every address.
pub fn cidr_hosts(ip: Ipv4Addr, prefix: u8) -> Result<Ipv4Range> {
    let network = Ipv4Network::new(ip, prefix)
        .map_err(|e| SweeprError::invalid(format!("{ip}/{prefix}"), e.to_string()))?;

    let start: u32 = network.network().into();
    let end: u32 = network.broadcast().into();

    if prefix >= 31 {
        return Ok(Ipv4Range::new(start.into(), end.into()));
    }

    Ok(Ipv4Range::new(
        Ipv4Addr::from(start + 1),
        Ipv4Addr::from(end - 1),
    ))
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
    fn ipv4_range_len_and_get() {
        let range = Ipv4Range::new(Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 3));
        assert_eq!(range.len(), 3);
        assert_eq!(range.get(0), Some(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(range.get(2), Some(Ipv4Addr::new(10, 0, 0, 3)));
        assert_eq!(range.get(3), None);
    }

    #[test]
    fn ipv4_range_reversed_is_empty() {
        let range = Ipv4Range::new(Ipv4Addr::new(10, 0, 0, 5), Ipv4Addr::new(10, 0, 0, 1));
        assert!(range.is_empty());
        assert_eq!(range.get(0), None);
    }

    #[test]
    fn ipv4_range_crosses_octet_boundary() {
        let range = Ipv4Range::new(
            Ipv4Addr::new(10, 0, 0, 255),
            Ipv4Addr::new(10, 0, 1, 1),
        );
        let all: Vec<Ipv4Addr> = (0..range.len()).filter_map(|i| range.get(i)).collect();
        assert_eq!(
            all,
            vec![
                Ipv4Addr::new(10, 0, 0, 255),
                Ipv4Addr::new(10, 0, 1, 0),
                Ipv4Addr::new(10, 0, 1, 1),
            ]
        );
    }

    #[test]
    fn port_range_rejects_zero_and_reversed() {
        assert!(PortRange::new(0, 10).is_err());
        assert!(PortRange::new(443, 80).is_err());
        let range = PortRange::new(20, 25).unwrap();
        assert_eq!(range.len(), 6);
        assert_eq!(range.get(5), Some(25));
        assert_eq!(range.get(6), None);
    }

    #[test]
    fn port_range_full_span() {
        let range = PortRange::new(1, u16::MAX).unwrap();
        assert_eq!(range.len(), 65_535);
        assert_eq!(range.get(65_534), Some(u16::MAX));
    }

    #[test]
    fn cidr_hosts_strips_network_and_broadcast() {
        let range = cidr_hosts(Ipv4Addr::new(192, 168, 1, 77), 24).unwrap();
        assert_eq!(range.start_addr, Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(range.end_addr, Ipv4Addr::new(192, 168, 1, 254));
        assert_eq!(range.len(), 254);
    }

    #[test]
    fn cidr_hosts_small_prefixes() {
        let slash30 = cidr_hosts(Ipv4Addr::new(10, 0, 0, 0), 30).unwrap();
        assert_eq!(slash30.len(), 2);

        let slash31 = cidr_hosts(Ipv4Addr::new(10, 0, 0, 0), 31).unwrap();
        assert_eq!(slash31.len(), 2);

        let slash32 = cidr_hosts(Ipv4Addr::new(172, 16, 0, 1), 32).unwrap();
        assert_eq!(slash32.start_addr, Ipv4Addr::new(172, 16, 0, 1));
        assert_eq!(slash32.len(), 1);
    }

    #[test]
    fn cidr_hosts_invalid_prefix() {
        let result = cidr_hosts(Ipv4Addr::new(192, 168, 1, 1), 33);
        assert!(matches!(
            result,
            Err(SweeprError::InvalidSpecification { .. })
        ));
    }
}
