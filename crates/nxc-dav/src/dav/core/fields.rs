//! Property selections and property values grouped by namespace prefix.

use std::fmt;

/// Scalar value of a filter rule or a property update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleValue {
    /// Text, written escaped.
    Text(String),
    /// Integer, written in decimal.
    Integer(i64),
    /// Boolean, written as `1` or `0`.
    Bool(bool),
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Bool(value) => f.write_str(if *value { "1" } else { "0" }),
        }
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RuleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for RuleValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for RuleValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for RuleValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for RuleValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Requested property names, grouped by prefix in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    groups: Vec<(String, Vec<String>)>,
}

impl FieldSelection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `prefix:local` to the selection.
    #[must_use]
    pub fn with(mut self, prefix: &str, local: &str) -> Self {
        self.push(prefix, local);
        self
    }

    /// Adds `prefix:local` to the selection in place.
    pub fn push(&mut self, prefix: &str, local: &str) {
        match self.groups.iter_mut().find(|(p, _)| p == prefix) {
            Some((_, names)) => {
                if !names.iter().any(|n| n == local) {
                    names.push(local.to_owned());
                }
            }
            None => self
                .groups
                .push((prefix.to_owned(), vec![local.to_owned()])),
        }
    }

    /// Returns whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates `(prefix, local names)` groups.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(prefix, names)| (prefix.as_str(), names.as_slice()))
    }
}

/// Property values, grouped by prefix in insertion order.
///
/// Used for `oc:filter-rules` in filter queries and for the `d:set` block
/// of property updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyValues {
    groups: Vec<(String, Vec<(String, RuleValue)>)>,
}

impl PropertyValues {
    /// Creates an empty value set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `prefix:local` to `value`.
    #[must_use]
    pub fn with(mut self, prefix: &str, local: &str, value: impl Into<RuleValue>) -> Self {
        self.insert(prefix, local, value);
        self
    }

    /// Sets `prefix:local` to `value` in place, replacing an earlier value.
    pub fn insert(&mut self, prefix: &str, local: &str, value: impl Into<RuleValue>) {
        let value = value.into();
        let group = match self.groups.iter().position(|(p, _)| p == prefix) {
            Some(index) => &mut self.groups[index].1,
            None => {
                self.groups.push((prefix.to_owned(), Vec::new()));
                let last = self.groups.len() - 1;
                &mut self.groups[last].1
            }
        };
        match group.iter_mut().find(|(name, _)| name == local) {
            Some((_, existing)) => *existing = value,
            None => group.push((local.to_owned(), value)),
        }
    }

    /// Returns whether no value is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|(_, values)| values.is_empty())
    }

    /// Iterates `(prefix, values)` groups.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[(String, RuleValue)])> {
        self.groups
            .iter()
            .map(|(prefix, values)| (prefix.as_str(), values.as_slice()))
    }
}
