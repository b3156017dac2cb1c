//! Case-insensitive HTTP header multi-map.
//!
//! Header names are normalized on insert and lookup, so `Content-Type`,
//! `content-type`, and `CONTENT-TYPE` address the same entry. The spelling
//! first seen for a name is kept for display and serialization. Values keep
//! their insertion order.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;

/// A single header entry: the display spelling plus its ordered values.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderEntry {
    /// The spelling first seen for this header name.
    name: String,
    /// Values in insertion order.
    values: Vec<String>,
}

/// An ordered, case-insensitive mapping from header name to values.
///
/// Iteration order is deterministic (sorted by normalized name), which keeps
/// violation messages and serialized payloads stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: BTreeMap<String, HeaderEntry>,
}

impl HeaderMap {
    /// Creates an empty header map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Normalizes a header name for lookup.
    fn normalize(name: &str) -> String {
        name.to_ascii_lowercase()
    }

    /// Appends a value to the given header, creating the entry if needed.
    pub fn append(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let name = name.as_ref();
        let entry = self
            .entries
            .entry(Self::normalize(name))
            .or_insert_with(|| HeaderEntry {
                name: name.to_string(),
                values: Vec::new(),
            });
        entry.values.push(value.into());
    }

    /// Replaces all values of the given header with a single value.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let name = name.as_ref();
        let entry = self
            .entries
            .entry(Self::normalize(name))
            .or_insert_with(|| HeaderEntry {
                name: name.to_string(),
                values: Vec::new(),
            });
        entry.values = vec![value.into()];
    }

    /// Returns the first value of the given header, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&Self::normalize(name))
            .and_then(|e| e.values.first())
            .map(String::as_str)
    }

    /// Returns all values of the given header in insertion order.
    #[must_use]
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries
            .get(&Self::normalize(name))
            .map_or(&[], |e| e.values.as_slice())
    }

    /// Returns true if the given header is present (case-insensitive).
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(&Self::normalize(name))
    }

    /// Returns the display spellings of all header names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.name.as_str())
    }

    /// Iterates over `(name, values)` pairs in normalized-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .values()
            .map(|e| (e.name.as_str(), e.values.as_slice()))
    }

    /// Number of distinct header names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no headers are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the subset of `required` names that are absent from this map,
    /// in the spelling the caller used.
    #[must_use]
    pub fn missing_from<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .filter(|name| !self.contains_key(name))
            .copied()
            .collect()
    }

    /// Returns the display names present in this map that are not in
    /// `allowed` (case-insensitive).
    #[must_use]
    pub fn not_in<'a>(&'a self, allowed: &[&str]) -> Vec<&'a str> {
        let allowed: Vec<String> = allowed.iter().map(|n| Self::normalize(n)).collect();
        self.entries
            .iter()
            .filter(|(key, _)| !allowed.contains(key))
            .map(|(_, entry)| entry.name.as_str())
            .collect()
    }

    /// Validates a header name for the wire contract.
    fn validate_name(name: &str) -> Result<(), DomainError> {
        let is_token = !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b"-_!#$%&'*+.^`|~".contains(&b));
        if is_token {
            Ok(())
        } else {
            Err(DomainError::InvalidHeaderName(name.to_string()))
        }
    }
}

impl<N: AsRef<str>, V: Into<String>> FromIterator<(N, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.append(name, value);
        }
        map
    }
}

impl Serialize for HeaderMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.values().map(|e| (e.name.as_str(), &e.values)))
    }
}

impl<'de> Deserialize<'de> for HeaderMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Vec<String>>::deserialize(deserializer)?;
        let mut map = Self::new();
        for (name, values) in raw {
            Self::validate_name(&name).map_err(D::Error::custom)?;
            let entry = map
                .entries
                .entry(Self::normalize(&name))
                .or_insert_with(|| HeaderEntry {
                    name,
                    values: Vec::new(),
                });
            entry.values.extend(values);
        }
        Ok(map)
    }
}
