/// Host identifiers and compressed host lists
///
/// This module handles:
/// - Parsing `name[:port]` host strings
/// - Collecting hosts into a deduplicated, insertion-ordered `HostSet`
/// - Compressing a set into bracketed range notation (`host[1-4,7]:10001`)
/// - Expanding such a label back into its hosts
///
/// Hosts are grouped into families keyed by alphabetic prefix, suffix
/// padding width and port. Families keep first-seen order; members inside
/// a family are sorted numerically and folded into ranges.
use crate::error::{ReportError, Result};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// A single host, as reported by the response collector
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostIdentifier {
    name: String,
    port: Option<u16>,
}

impl HostIdentifier {
    /// Parse a `name` or `name:port` string
    pub fn parse(input: &str) -> Result<Self> {
        let (name, port) = match input.rsplit_once(':') {
            Some((name, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| ReportError::parse(input, format!("invalid port {:?}", port)))?;
                (name, Some(port))
            }
            None => (input, None),
        };

        if name.is_empty() {
            return Err(ReportError::parse(input, "empty host name"));
        }
        if let Some(c) = name.chars().find(|c| c.is_whitespace() || matches!(c, ',' | '[' | ']' | ':')) {
            return Err(ReportError::parse(input, format!("unexpected character {:?} in host name", c)));
        }

        Ok(HostIdentifier { name: name.to_string(), port })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Split the name into its alphabetic prefix and trailing number, if any
    fn split_suffix(&self) -> (&str, Option<Suffix>) {
        let digits = self.name.bytes().rev().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return (&self.name, None);
        }

        let (prefix, number) = self.name.split_at(self.name.len() - digits);
        match number.parse::<u64>() {
            Ok(value) => (prefix, Some(Suffix { value, width: padded_width(number) })),
            // Too long to be a range member; keep the whole name as a literal
            Err(_) => (&self.name, None),
        }
    }
}

impl FromStr for HostIdentifier {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        HostIdentifier::parse(s)
    }
}

impl fmt::Display for HostIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.name, port),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Numeric host suffix. `width` is non-zero only for zero-padded numbers.
#[derive(Debug, Clone, Copy)]
struct Suffix {
    value: u64,
    width: usize,
}

fn padded_width(digits: &str) -> usize {
    if digits.len() > 1 && digits.starts_with('0') { digits.len() } else { 0 }
}

fn format_number(value: u64, width: usize) -> String {
    format!("{:0width$}", value, width = width)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FamilyKey {
    prefix: String,
    /// None for names without a numeric suffix
    width: Option<usize>,
    port: Option<u16>,
}

/// Ordered, deduplicated collection of hosts
#[derive(Debug, Clone, Default)]
pub struct HostSet {
    hosts: Vec<HostIdentifier>,
    seen: HashSet<HostIdentifier>,
}

impl HostSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and add a host string
    pub fn add(&mut self, host: &str) -> Result<()> {
        self.insert(HostIdentifier::parse(host)?)
    }

    /// Add an already parsed host, rejecting duplicates
    pub fn insert(&mut self, host: HostIdentifier) -> Result<()> {
        if !self.seen.insert(host.clone()) {
            return Err(ReportError::DuplicateHost(host.to_string()));
        }
        self.hosts.push(host);
        Ok(())
    }

    pub fn contains(&self, host: &HostIdentifier) -> bool {
        self.seen.contains(host)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Hosts in the order they were added
    pub fn iter(&self) -> impl Iterator<Item = &HostIdentifier> {
        self.hosts.iter()
    }

    /// Compressed label including ports
    pub fn compress(&self) -> String {
        self.compress_with(true)
    }

    /// Compressed label; with `include_ports` false, ports are dropped before
    /// grouping and hosts that differ only by port collapse together.
    pub fn compress_with(&self, include_ports: bool) -> String {
        let port_of = |host: &HostIdentifier| if include_ports { host.port } else { None };

        // Widths of zero-padded suffixes per prefix and port. An unpadded
        // number with exactly that many digits prints the same at that width.
        let mut padded: HashSet<(&str, Option<u16>, usize)> = HashSet::new();
        for host in &self.hosts {
            if let (prefix, Some(suffix)) = host.split_suffix()
                && suffix.width > 0
            {
                padded.insert((prefix, port_of(host), suffix.width));
            }
        }

        let mut index: HashMap<FamilyKey, usize> = HashMap::new();
        let mut families: Vec<(FamilyKey, BTreeSet<u64>)> = Vec::new();

        for host in &self.hosts {
            let (prefix, suffix) = host.split_suffix();
            let width = suffix.map(|s| {
                let digits = s.value.to_string().len();
                if s.width == 0 && padded.contains(&(prefix, port_of(host), digits)) { digits } else { s.width }
            });
            let key = FamilyKey { prefix: prefix.to_string(), width, port: port_of(host) };

            let slot = *index.entry(key.clone()).or_insert_with(|| {
                families.push((key, BTreeSet::new()));
                families.len() - 1
            });
            if let Some(suffix) = suffix {
                families[slot].1.insert(suffix.value);
            }
        }

        families.iter().map(|(key, members)| format_family(key, members)).collect::<Vec<_>>().join(",")
    }

    /// Expand a compressed label back into its hosts
    pub fn decompress(label: &str) -> Result<HostSet> {
        let mut set = HostSet::new();
        for segment in split_segments(label) {
            if segment.is_empty() {
                continue;
            }
            for host in expand_segment(segment)? {
                set.insert(host)?;
            }
        }
        Ok(set)
    }
}

impl fmt::Display for HostSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.compress())
    }
}

impl PartialEq for HostSet {
    /// Membership equality, independent of insertion order
    fn eq(&self, other: &Self) -> bool {
        self.seen == other.seen
    }
}

impl Eq for HostSet {}

fn format_family(key: &FamilyKey, members: &BTreeSet<u64>) -> String {
    let width = key.width.unwrap_or(0);
    let mut out = key.prefix.clone();

    if members.len() == 1 {
        if let Some(value) = members.first() {
            out.push_str(&format_number(*value, width));
        }
    } else if !members.is_empty() {
        out.push('[');
        out.push_str(&fold_ranges(members, width).join(","));
        out.push(']');
    }

    if let Some(port) = key.port {
        out.push_str(&format!(":{}", port));
    }
    out
}

/// Fold sorted values into `first-last` runs and isolated numbers
fn fold_ranges(members: &BTreeSet<u64>, width: usize) -> Vec<String> {
    let mut ranges = Vec::new();
    let mut run: Option<(u64, u64)> = None;

    for &value in members {
        run = match run {
            Some((first, last)) if last.checked_add(1) == Some(value) => Some((first, value)),
            Some(done) => {
                ranges.push(done);
                Some((value, value))
            }
            None => Some((value, value)),
        };
    }
    ranges.extend(run);

    ranges
        .into_iter()
        .map(|(first, last)| {
            if first == last {
                format_number(first, width)
            } else {
                format!("{}-{}", format_number(first, width), format_number(last, width))
            }
        })
        .collect()
}

/// Split on commas that are not inside brackets
fn split_segments(label: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in label.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                segments.push(&label[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&label[start..]);
    segments
}

/// Upper bound on the hosts a single `first-last` range may expand to
const MAX_RANGE_HOSTS: u64 = 1 << 20;

fn expand_segment(segment: &str) -> Result<Vec<HostIdentifier>> {
    let Some(open) = segment.find('[') else {
        return Ok(vec![HostIdentifier::parse(segment)?]);
    };
    let close = segment.find(']').ok_or_else(|| ReportError::parse(segment, "unterminated range"))?;
    if close < open {
        return Err(ReportError::parse(segment, "unbalanced brackets"));
    }

    let prefix = &segment[..open];
    let body = &segment[open + 1..close];
    let rest = &segment[close + 1..];
    if !rest.is_empty() && !rest.starts_with(':') {
        return Err(ReportError::parse(segment, format!("unexpected text {:?} after range", rest)));
    }

    let mut hosts = Vec::new();
    for part in body.split(',') {
        let (first, last) = part.split_once('-').unwrap_or((part, part));
        let width = padded_width(first);
        let start = parse_range_bound(segment, first)?;
        let end = parse_range_bound(segment, last)?;
        if end < start {
            return Err(ReportError::parse(segment, format!("descending range {:?}", part)));
        }
        if end - start >= MAX_RANGE_HOSTS {
            return Err(ReportError::parse(segment, format!("range too large {:?}", part)));
        }
        for value in start..=end {
            hosts.push(HostIdentifier::parse(&format!("{}{}{}", prefix, format_number(value, width), rest))?);
        }
    }
    Ok(hosts)
}

fn parse_range_bound(segment: &str, bound: &str) -> Result<u64> {
    if bound.is_empty() || !bound.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ReportError::parse(segment, format!("invalid range bound {:?}", bound)));
    }
    bound.parse::<u64>().map_err(|e| ReportError::parse(segment, e.to_string()))
}

/// Compare two labels so that embedded numbers sort by value
/// (`host2` before `host10`). Range brackets are ignored, so `host[1-2]`
/// sorts by its first member.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let strip = |s: &str| s.chars().filter(|c| !matches!(c, '[' | ']')).collect::<String>();
    let (a_key, b_key) = (strip(a), strip(b));
    let mut left = chunks(&a_key);
    let mut right = chunks(&b_key);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (is_number(x), is_number(y)) {
                    (true, true) => {
                        let (x, y) = (x.trim_start_matches('0'), y.trim_start_matches('0'));
                        x.len().cmp(&y.len()).then_with(|| x.cmp(y))
                    }
                    _ => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn is_number(chunk: &str) -> bool {
    chunk.bytes().next().is_some_and(|b| b.is_ascii_digit())
}

/// Split a string into alternating runs of digits and non-digits
fn chunks(s: &str) -> impl Iterator<Item = &str> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digit = first.is_ascii_digit();
        let end = rest.find(|c: char| c.is_ascii_digit() != digit).unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}

#[cfg(test)]
#[path = "hostlist_test.rs"]
mod hostlist_test;
