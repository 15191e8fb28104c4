use std::collections::hash_map::{Entry, HashMap};

use serde::Serialize;

/// One field's value: a scalar until the same name repeats, then an
/// ordered list in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A single value.
    Text(String),
    /// Repeated values, in arrival order.
    List(Vec<String>),
}

impl FieldValue {
    /// The first-arrived value.
    pub fn first(&self) -> &str {
        match self {
            Self::Text(value) => value,
            Self::List(values) => values.first().map(String::as_str).unwrap_or_default(),
        }
    }

    /// Every value, in arrival order.
    pub fn all(&self) -> Vec<&str> {
        match self {
            Self::Text(value) => vec![value],
            Self::List(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// How many values arrived under this name.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(_) => 1,
            Self::List(values) => values.len(),
        }
    }

    /// Whether the value is empty. A parsed field always holds at least
    /// one value, so this is only true for a detached empty list.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Non-file fields of one parsed request, keyed by field name.
#[derive(Debug, Default, Clone, Serialize)]
pub struct FieldMap {
    inner: HashMap<String, FieldValue>,
}

impl FieldMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, name: String, value: String) {
        match self.inner.entry(name) {
            Entry::Vacant(entry) => {
                entry.insert(FieldValue::Text(value));
            }
            Entry::Occupied(mut entry) => match entry.get_mut() {
                FieldValue::List(values) => values.push(value),
                FieldValue::Text(first) => {
                    let first = std::mem::take(first);
                    entry.insert(FieldValue::List(vec![first, value]));
                }
            },
        }
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.inner.get(name)
    }

    /// First-arrived value of a field, if present.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(FieldValue::first)
    }

    /// Whether the field arrived at all.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Number of distinct field names.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether no fields arrived.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.inner.iter().map(|(name, value)| (name.as_str(), value))
    }
}
