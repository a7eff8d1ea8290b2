//! Grouping of per-host outcomes by structural equality.
//!
//! Each distinct value gets one [`AggregationGroup`] holding the set of hosts
//! that reported it. Values are compared through a canonical JSON encoding,
//! so any `Serialize` type with deterministic field order can be grouped.
//! Groups are yielded in the order their key was first observed.

use crate::error::{ReportError, Result};
use crate::hostlist::{HostIdentifier, HostSet};
use log::debug;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Hosts that produced one distinct value
#[derive(Debug, Clone)]
pub struct AggregationGroup<V> {
    pub key: String,
    pub hosts: HostSet,
    pub value: V,
}

/// Insertion-ordered map from canonical key to group.
#[derive(Debug, Clone)]
pub struct Aggregator<V> {
    groups: Vec<AggregationGroup<V>>,
    by_key: HashMap<String, usize>,
    hosts: HashSet<HostIdentifier>,
}

impl<V> Default for Aggregator<V> {
    fn default() -> Self {
        Self { groups: Vec::new(), by_key: HashMap::new(), hosts: HashSet::new() }
    }
}

impl<V: Serialize> Aggregator<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` for `host`.
    ///
    /// Fails with `Parse` for a malformed host string and with
    /// `DuplicateHost` if the host already contributed a value to this map.
    pub fn add(&mut self, host: &str, value: V) -> Result<()> {
        let host = HostIdentifier::parse(host)?;
        self.insert(host, value)
    }

    pub(crate) fn insert(&mut self, host: HostIdentifier, value: V) -> Result<()> {
        if self.hosts.contains(&host) {
            debug!("rejecting duplicate host {}", host);
            return Err(ReportError::DuplicateHost(host.to_string()));
        }

        let key = canonical_key(&value)?;
        let slot = match self.by_key.get(&key) {
            Some(&slot) => slot,
            None => {
                debug!("new outcome group #{} first seen on {}", self.groups.len(), host);
                self.groups.push(AggregationGroup { key: key.clone(), hosts: HostSet::new(), value });
                self.by_key.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };

        self.groups[slot].hosts.insert(host.clone())?;
        self.hosts.insert(host);
        Ok(())
    }

    pub(crate) fn contains_host(&self, host: &HostIdentifier) -> bool {
        self.hosts.contains(host)
    }
}

impl<V> Aggregator<V> {
    /// Groups in first-seen key order
    pub fn groups(&self) -> &[AggregationGroup<V>] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of hosts across all groups
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }
}

impl<V> IntoIterator for Aggregator<V> {
    type Item = AggregationGroup<V>;
    type IntoIter = std::vec::IntoIter<AggregationGroup<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Canonical encoding used as the grouping key.
///
/// Two values share a key iff every serialized field matches. Map-typed
/// fields must serialize in a stable order (`BTreeMap`, `serde_json::Value`).
pub fn canonical_key<V: Serialize + ?Sized>(value: &V) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Error message reported by a host; the error-map value type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct HostError(pub String);

impl HostError {
    pub fn new(msg: impl Into<String>) -> Self {
        HostError(msg.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub type HostErrorsMap = Aggregator<HostError>;

/// Error map and result map for one batch of responses.
///
/// A host lands in exactly one of the two maps.
#[derive(Debug, Clone)]
pub struct HostResults<V> {
    pub errors: HostErrorsMap,
    pub results: Aggregator<V>,
}

impl<V> Default for HostResults<V> {
    fn default() -> Self {
        Self { errors: HostErrorsMap::default(), results: Aggregator::default() }
    }
}

impl<V: Serialize> HostResults<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, host: &str, error: impl Into<HostError>) -> Result<()> {
        let host = HostIdentifier::parse(host)?;
        if self.results.contains_host(&host) {
            return Err(ReportError::DuplicateHost(host.to_string()));
        }
        self.errors.insert(host, error.into())
    }

    pub fn add_result(&mut self, host: &str, value: V) -> Result<()> {
        let host = HostIdentifier::parse(host)?;
        if self.errors.contains_host(&host) {
            return Err(ReportError::DuplicateHost(host.to_string()));
        }
        self.results.insert(host, value)
    }

    /// True when neither map holds any host
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.results.is_empty()
    }
}

impl From<&str> for HostError {
    fn from(msg: &str) -> Self {
        HostError(msg.to_string())
    }
}

impl From<String> for HostError {
    fn from(msg: String) -> Self {
        HostError(msg)
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod aggregate_test;
