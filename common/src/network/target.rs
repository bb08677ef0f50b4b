//! # Probe Target Model
//!
//! Defines what a probe can be pointed at and how a run's targets are
//! enumerated.
//!
//! A target source is a comma-separated list where every part is one of:
//! * A CIDR block (e.g., `192.168.1.0/24`), enumerated as its usable hosts.
//! * An IPv4 range (e.g., `192.168.1.1-100` or `10.0.0.1-10.0.1.255`).
//! * A port range (e.g., `1-1024`).
//! * A single port, IP address or hostname.
//!
//! Enumeration is lazy: a [`TargetSet`] stores ranges, not addresses, and can
//! be iterated any number of times in the same order.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::error::{Result, SweeprError};
use crate::network::range::{self, Ipv4Range, PortRange};

/// Upper bound on the number of targets a single run may enumerate.
pub const MAX_TARGETS: usize = 1 << 20;

/// A single thing to probe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    /// A hostname or a wordlist entry (subdomain label, URL path).
    Host(String),
    /// A literal IPv4/IPv6 address.
    Ip(IpAddr),
    /// A TCP port on a host chosen by the probe.
    Port(u16),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Host(name) => f.write_str(name),
            Target::Ip(addr) => write!(f, "{addr}"),
            Target::Port(port) => write!(f, "{port}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Literal targets; consecutive literals share one list.
    List(Vec<Target>),
    Addresses(Ipv4Range),
    Ports(PortRange),
}

impl Segment {
    fn len(&self) -> usize {
        match self {
            Segment::List(targets) => targets.len(),
            Segment::Addresses(range) => range.len(),
            Segment::Ports(range) => range.len(),
        }
    }

    fn get(&self, offset: usize) -> Option<Target> {
        match self {
            Segment::List(targets) => targets.get(offset).cloned(),
            Segment::Addresses(range) => range.get(offset).map(|ip| Target::Ip(IpAddr::V4(ip))),
            Segment::Ports(range) => range.get(offset).map(Target::Port),
        }
    }
}

/// An ordered, finite, restartable sequence of [`Target`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    segments: Vec<Segment>,
    /// Enumeration index of the first target of each segment.
    starts: Vec<usize>,
    len: usize,
}

impl TargetSet {
    /// Parses a target source. See the module docs for the accepted syntax.
    pub fn parse(s: &str) -> Result<Self> {
        let mut set = TargetSet::default();

        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            set.push(parse_part(part)?, s)?;
        }

        if set.is_empty() {
            return Err(SweeprError::invalid(s, "no targets given"));
        }

        Ok(set)
    }

    /// Builds a set where every entry is a [`Target::Host`], as wordlists need.
    ///
    /// Blank entries and `#` comments are skipped.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = TargetSet::default();

        for word in words {
            let word = word.as_ref().trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            ensure_literal(word)?;
            set.push(Segment::List(vec![Target::Host(word.to_string())]), word)?;
        }

        if set.is_empty() {
            return Err(SweeprError::invalid("<wordlist>", "wordlist has no entries"));
        }

        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the target at enumeration position `index`.
    pub fn get(&self, index: usize) -> Option<Target> {
        if index >= self.len {
            return None;
        }
        let segment = self.starts.partition_point(|&start| start <= index).checked_sub(1)?;
        self.segments.get(segment)?.get(index - self.starts[segment])
    }

    pub fn iter(&self) -> Targets<'_> {
        Targets {
            segments: &self.segments,
            segment: 0,
            offset: 0,
        }
    }

    fn push(&mut self, segment: Segment, input: &str) -> Result<()> {
        let len = self.len + segment.len();
        if len > MAX_TARGETS {
            return Err(SweeprError::invalid(
                input,
                format!("expands to more than {MAX_TARGETS} targets"),
            ));
        }
        if segment.len() == 0 {
            return Ok(());
        }

        match segment {
            Segment::List(more) if matches!(self.segments.last(), Some(Segment::List(_))) => {
                if let Some(Segment::List(last)) = self.segments.last_mut() {
                    last.extend(more);
                }
            }
            segment => {
                self.starts.push(self.len);
                self.segments.push(segment);
            }
        }
        self.len = len;
        Ok(())
    }
}

impl FromStr for TargetSet {
    type Err = SweeprError;

    fn from_str(s: &str) -> Result<Self> {
        TargetSet::parse(s)
    }
}

impl FromIterator<Target> for TargetSet {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        let targets: Vec<Target> = iter.into_iter().collect();
        if targets.is_empty() {
            return TargetSet::default();
        }
        TargetSet {
            len: targets.len(),
            starts: vec![0],
            segments: vec![Segment::List(targets)],
        }
    }
}

impl<'a> IntoIterator for &'a TargetSet {
    type Item = Target;
    type IntoIter = Targets<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`TargetSet`] in enumeration order.
#[derive(Debug, Clone)]
pub struct Targets<'a> {
    segments: &'a [Segment],
    segment: usize,
    offset: usize,
}

impl Iterator for Targets<'_> {
    type Item = Target;

    fn next(&mut self) -> Option<Target> {
        while let Some(segment) = self.segments.get(self.segment) {
            if let Some(target) = segment.get(self.offset) {
                self.offset += 1;
                return Some(target);
            }
            self.segment += 1;
            self.offset = 0;
        }
        None
    }
}

fn parse_part(part: &str) -> Result<Segment> {
    ensure_literal(part)?;

    if part.contains('/') {
        return parse_cidr(part);
    }

    if let Some(segment) = parse_range(part)? {
        return Ok(segment);
    }

    if let Ok(port) = part.parse::<u16>() {
        if port == 0 {
            return Err(SweeprError::invalid(part, "port 0 is not probeable"));
        }
        return Ok(Segment::List(vec![Target::Port(port)]));
    }

    if let Ok(addr) = part.parse::<IpAddr>() {
        return Ok(Segment::List(vec![Target::Ip(addr)]));
    }

    if looks_numeric(part) {
        return Err(SweeprError::invalid(part, "neither a valid port nor a valid IP address"));
    }

    Ok(Segment::List(vec![Target::Host(part.to_string())]))
}

/// Rejects entries that could never name a target.
fn ensure_literal(part: &str) -> Result<()> {
    if part.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(SweeprError::invalid(part, "entries may not contain whitespace"));
    }
    Ok(())
}

/// Dot-separated labels of letters, digits and inner hyphens, with at
/// least one letter somewhere.
fn is_hostname(s: &str) -> bool {
    let labels_ok = s.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    labels_ok && s.chars().any(|c| c.is_ascii_alphabetic())
}

fn looks_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Parses CIDR notation like "192.168.1.0/24".
fn parse_cidr(s: &str) -> Result<Segment> {
    let Some((ip_str, prefix_str)) = s.split_once('/') else {
        return Err(SweeprError::invalid(s, "expected <ipv4>/<prefix>"));
    };

    let ipv4_addr = ip_str
        .parse::<Ipv4Addr>()
        .map_err(|e| SweeprError::invalid(s, format!("invalid IP in CIDR '{ip_str}': {e}")))?;

    let prefix = prefix_str
        .parse::<u8>()
        .map_err(|e| SweeprError::invalid(s, format!("invalid prefix '{prefix_str}': {e}")))?;

    Ok(Segment::Addresses(range::cidr_hosts(ipv4_addr, prefix)?))
}

/// Parses "80-443", "1.1.1.1-2.2.2.2" or "1.1.1.1-50".
///
/// Returns `Ok(None)` for dashed hostnames such as "my-host".
fn parse_range(s: &str) -> Result<Option<Segment>> {
    let Some((start_str, end_str)) = s.split_once('-') else {
        return Ok(None);
    };

    if let Ok(start_port) = start_str.parse::<u16>() {
        if !end_str.chars().all(|c| c.is_ascii_digit()) && is_hostname(s) {
            return Ok(None);
        }
        let end_port = end_str
            .parse::<u16>()
            .map_err(|e| SweeprError::invalid(s, format!("invalid end port '{end_str}': {e}")))?;
        return Ok(Some(Segment::Ports(PortRange::new(start_port, end_port)?)));
    }

    if let Ok(start_addr) = start_str.parse::<Ipv4Addr>() {
        let end_addr = parse_range_end_addr(end_str, &start_addr)
            .map_err(|reason| SweeprError::invalid(s, reason))?;
        if u32::from(start_addr) > u32::from(end_addr) {
            return Err(SweeprError::invalid(s, "range start is above range end"));
        }
        return Ok(Some(Segment::Addresses(Ipv4Range::new(start_addr, end_addr))));
    }

    if looks_numeric(start_str) {
        return Err(SweeprError::invalid(
            s,
            format!("invalid range start '{start_str}'"),
        ));
    }

    Ok(None)
}

/// Helper to parse the end address of a range.
///
/// Handles abbreviated forms like "192.168.1.1-50" (implies 192.168.1.50)
/// and full forms like "192.168.1.1-192.168.1.255".
fn parse_range_end_addr(
    end_str: &str,
    start_addr: &Ipv4Addr,
) -> std::result::Result<Ipv4Addr, String> {
    if let Ok(full_addr) = end_str.parse::<Ipv4Addr>() {
        return Ok(full_addr);
    }

    let mut end_octets = start_addr.octets();
    let partial_octets: Vec<u8> = end_str
        .split('.')
        .map(|octet_str| octet_str.parse::<u8>())
        .collect::<std::result::Result<Vec<u8>, _>>()
        .map_err(|e| format!("invalid end range '{end_str}': {e}"))?;

    if partial_octets.is_empty() {
        return Err("end range cannot be empty".to_string());
    }
    if partial_octets.len() > 4 {
        return Err(format!("end range has too many octets: {end_str}"));
    }

    let start_index = 4 - partial_octets.len();
    end_octets[start_index..].copy_from_slice(&partial_octets);

    Ok(Ipv4Addr::from(end_octets))
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

    fn ip(a: u8, b: u8, c: u8, d: u8) -> Target {
        Target::Ip(IpAddr::V4(Ipv4Addr::new(a, b, c, d)))
    }

    #[test]
    fn test_parse_range_end_addr_helper() {
        let start = Ipv4Addr::new(192, 168, 1, 10);

        assert_eq!(
            parse_range_end_addr("192.168.1.50", &start),
            Ok(Ipv4Addr::new(192, 168, 1, 50))
        );
        assert_eq!(
            parse_range_end_addr("50", &start),
            Ok(Ipv4Addr::new(192, 168, 1, 50))
        );
        assert_eq!(
            parse_range_end_addr("2.66", &start),
            Ok(Ipv4Addr::new(192, 168, 2, 66))
        );
        assert_eq!(
            parse_range_end_addr("10.2.1", &start),
            Ok(Ipv4Addr::new(192, 10, 2, 1))
        );

        // --- Error Cases ---
        assert!(parse_range_end_addr("2.256", &start).is_err());
        assert!(parse_range_end_addr("1.2.3.4.5", &start).is_err());
        assert!(parse_range_end_addr("", &start).is_err());
    }

    #[test]
    fn literal_list_keeps_order_and_types() {
        let set = TargetSet::parse("80, 443,example.com,10.0.0.1,::1").unwrap();
        let all: Vec<Target> = set.iter().collect();
        assert_eq!(
            all,
            vec![
                Target::Port(80),
                Target::Port(443),
                Target::Host("example.com".into()),
                ip(10, 0, 0, 1),
                Target::Ip("::1".parse().unwrap()),
            ]
        );
    }

    #[test]
    fn port_range_enumerates_ascending() {
        let set = TargetSet::parse("20-23").unwrap();
        assert_eq!(set.len(), 4);
        let ports: Vec<Target> = set.iter().collect();
        assert_eq!(
            ports,
            vec![Target::Port(20), Target::Port(21), Target::Port(22), Target::Port(23)]
        );
    }

    #[test]
    fn cidr_enumerates_usable_hosts() {
        let set = TargetSet::parse("192.168.1.0/30").unwrap();
        let all: Vec<Target> = set.iter().collect();
        assert_eq!(all, vec![ip(192, 168, 1, 1), ip(192, 168, 1, 2)]);
    }

    #[test]
    fn mixed_parts_concatenate() {
        let set = TargetSet::parse("10.0.0.1-3,22").unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.get(0), Some(ip(10, 0, 0, 1)));
        assert_eq!(set.get(2), Some(ip(10, 0, 0, 3)));
        assert_eq!(set.get(3), Some(Target::Port(22)));
        assert_eq!(set.get(4), None);
    }

    #[test]
    fn iteration_is_restartable() {
        let set = TargetSet::parse("1-5,host-a").unwrap();
        let first: Vec<Target> = set.iter().collect();
        let second: Vec<Target> = set.iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), set.len());
        for (idx, target) in first.iter().enumerate() {
            assert_eq!(set.get(idx).as_ref(), Some(target));
        }
    }

    #[test]
    fn dashed_hostname_is_a_host() {
        let set = TargetSet::parse("my-host.local").unwrap();
        assert_eq!(set.get(0), Some(Target::Host("my-host.local".into())));
    }

    #[test]
    fn hostname_with_leading_number_is_a_host() {
        let set = TargetSet::parse("1-800-flowers.com,80-abc").unwrap();
        assert_eq!(set.get(0), Some(Target::Host("1-800-flowers.com".into())));
        assert_eq!(set.get(1), Some(Target::Host("80-abc".into())));
    }

    #[test]
    fn large_wordlist_is_randomly_accessible() {
        let words: Vec<String> = (0..100_000).map(|i| format!("word{i}")).collect();
        let set = TargetSet::from_words(&words).unwrap();
        assert_eq!(set.len(), 100_000);

        let started = std::time::Instant::now();
        for (idx, word) in words.iter().enumerate() {
            assert_eq!(set.get(idx), Some(Target::Host(word.clone())));
        }
        assert!(
            started.elapsed() < std::time::Duration::from_secs(2),
            "claiming every entry took {:?}",
            started.elapsed()
        );
    }

    #[test]
    fn lookups_span_mixed_segments() {
        let set = TargetSet::parse("a,b,10.0.0.1-2,c,22-23,d").unwrap();
        let all: Vec<Target> = set.iter().collect();
        assert_eq!(all.len(), set.len());
        for (idx, target) in all.iter().enumerate() {
            assert_eq!(set.get(idx).as_ref(), Some(target));
        }
        assert_eq!(set.get(4), Some(Target::Host("c".into())));
        assert_eq!(set.get(set.len()), None);
    }

    #[test]
    fn invalid_sources_are_rejected() {
        let invalid = [
            "",
            " , ",
            "10.0.0.0/33",
            "10.0.0.x/24",
            "::1/64",
            "80-",
            "80--90",
            "443-80",
            "0",
            "70000",
            "10.0.0.256-1.1.1.1",
            "10.0.0.9-10.0.0.1",
            "1.2.3",
            "bad host",
        ];
        for source in invalid {
            let result = TargetSet::parse(source);
            assert!(
                matches!(result, Err(SweeprError::InvalidSpecification { .. })),
                "expected '{source}' to be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn oversized_source_is_rejected() {
        assert!(TargetSet::parse("10.0.0.0/8").is_err());
        assert!(TargetSet::parse("10.0.0.0/12").is_ok());
    }

    #[test]
    fn from_words_skips_blanks_and_comments() {
        let set = TargetSet::from_words(["www", "", "  # comment", " api ", "8080"]).unwrap();
        let all: Vec<Target> = set.iter().collect();
        assert_eq!(
            all,
            vec![
                Target::Host("www".into()),
                Target::Host("api".into()),
                Target::Host("8080".into()),
            ]
        );
    }

    #[test]
    fn from_words_rejects_empty_list() {
        assert!(TargetSet::from_words(Vec::<String>::new()).is_err());
        assert!(TargetSet::from_words(["", "#only comments"]).is_err());
    }

    #[test]
    fn collected_targets_keep_duplicates() {
        let set: TargetSet = vec![Target::Port(80), Target::Port(80)].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
