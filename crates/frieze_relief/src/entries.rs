//! Ordered key/value view over a collection value.
//!
//! The list reconciler iterates whatever a repeat expression evaluates to
//! through this view and never looks at the concrete value again.

use std::iter::Enumerate;
use std::slice;

use crate::errors::CollectionTypeError;
use crate::value::{Map, Value, ValueExt};

/// A collection snapshot: ordered `(key, value)` pairs.
#[derive(Debug, Clone, Copy)]
pub enum Entries<'a> {
    /// Array elements keyed by position.
    Indexed(&'a [Value]),
    /// Object members keyed by name, in insertion order.
    Named(&'a Map<String, Value>),
}

/// Key of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'a> {
    Index(usize),
    Name(&'a str),
}

impl std::fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

impl<'a> Entries<'a> {
    /// View `value` as a collection.
    ///
    /// `null` is an empty collection. Scalars are rejected.
    pub fn from_value(value: &'a Value) -> Result<Self, CollectionTypeError> {
        match value {
            Value::Array(items) => Ok(Entries::Indexed(items)),
            Value::Object(map) => Ok(Entries::Named(map)),
            Value::Null => Ok(Entries::Indexed(&[])),
            other => Err(CollectionTypeError {
                found: other.type_name(),
            }),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            Entries::Indexed(items) => items.len(),
            Entries::Named(map) => map.len(),
        }
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate entries in collection order.
    pub fn iter(&self) -> EntriesIter<'a> {
        match *self {
            Entries::Indexed(items) => EntriesIter::Indexed(items.iter().enumerate()),
            Entries::Named(map) => EntriesIter::Named(map.iter()),
        }
    }
}

impl<'a> IntoIterator for Entries<'a> {
    type Item = (Key<'a>, &'a Value);
    type IntoIter = EntriesIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over [`Entries`].
pub enum EntriesIter<'a> {
    Indexed(Enumerate<slice::Iter<'a, Value>>),
    Named(serde_json::map::Iter<'a>),
}

impl<'a> Iterator for EntriesIter<'a> {
    type Item = (Key<'a>, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            EntriesIter::Indexed(iter) => iter.next().map(|(i, v)| (Key::Index(i), v)),
            EntriesIter::Named(iter) => iter.next().map(|(k, v)| (Key::Name(k.as_str()), v)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            EntriesIter::Indexed(iter) => iter.size_hint(),
            EntriesIter::Named(iter) => iter.size_hint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_indexed() {
        let value = json!(["a", "b"]);
        let entries = Entries::from_value(&value).unwrap();
        let collected: Vec<_> = entries.iter().collect();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0], (Key::Index(0), &json!("a")));
        assert_eq!(collected[1], (Key::Index(1), &json!("b")));
    }

    #[test]
    fn test_named_keeps_insertion_order() {
        let value: Value = serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<String> = Entries::from_value(&value)
            .unwrap()
            .iter()
            .map(|(k, _)| k.to_string())
            .collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_null_is_empty() {
        let value = Value::Null;
        assert!(Entries::from_value(&value).unwrap().is_empty());
    }

    #[test]
    fn test_scalar_rejected() {
        let value = json!("not a list");
        let err = Entries::from_value(&value).unwrap_err();
        assert_eq!(err.found, "string");
        assert!(Entries::from_value(&json!(3)).is_err());
        assert!(Entries::from_value(&json!(true)).is_err());
    }
}
