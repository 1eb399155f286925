//! Wire parameters and the key-renaming tables.
//!
//! Every operation takes typed options with human-readable field names. Those
//! options are first flattened into a [`Params`] keyed by the human names, and
//! then renamed into the wire names the panel expects. Renaming always builds
//! a new mapping; the input is never touched.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-operation `(human key, wire key)` pairs.
pub type RenameTable = &'static [(&'static str, &'static str)];

/// A scalar parameter value. Booleans go over the wire as `1` / `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl ParamValue {
    pub fn to_wire(&self) -> String {
        match self {
            Self::Bool(true) => "1".to_string(),
            Self::Bool(false) => "0".to_string(),
            Self::Int(n) => n.to_string(),
            Self::Str(s) => s.clone(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

/// Parameter mapping, ordered by key so the encoded query is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Inserts only when a value is present; `None` leaves the map unchanged.
    pub fn insert_opt<V: Into<ParamValue>>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.0.insert(key.to_string(), value.into());
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    /// Returns a new mapping with every key found in `table` replaced by its
    /// wire name. Other keys pass through unchanged. When a renamed key lands
    /// on a key that was already present, the renamed value wins.
    pub fn renamed(&self, table: RenameTable) -> Params {
        let mut untouched = BTreeMap::new();
        let mut renamed = BTreeMap::new();
        for (key, value) in &self.0 {
            match table.iter().find(|(human, _)| *human == key.as_str()) {
                Some((_, wire)) => {
                    renamed.insert(wire.to_string(), value.clone());
                }
                None => {
                    untouched.insert(key.clone(), value.clone());
                }
            }
        }
        untouched.extend(renamed);
        Params(untouched)
    }

    /// Key/value pairs encoded the way they go on the wire.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(key, value)| (key.clone(), value.to_wire()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Typed options for one remote operation.
pub trait WireOptions {
    /// Renames applied before the options go on the wire.
    const RENAMES: RenameTable;

    /// The options keyed by their human-readable names.
    fn to_params(&self) -> Params;

    fn to_wire(&self) -> Params {
        self.to_params().renamed(Self::RENAMES)
    }
}

/// Checks that a table can be applied twice without changing the result:
/// no wire name is also a human key, and no human key appears twice.
pub fn is_well_formed(table: RenameTable) -> bool {
    table.iter().enumerate().all(|(i, (human, wire))| {
        !table.iter().any(|(other, _)| other == wire)
            && !table[i + 1..].iter().any(|(other, _)| other == human)
    })
}
