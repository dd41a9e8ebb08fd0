//! Records of diagnostic values produced by the agent.
//!
//! A [`Record`] is a set of named values. [`QLearn::update_with_record`] returns
//! one per Bellman update so that a training loop can log or aggregate the
//! temporal-difference error without recomputing it.
//!
//! [`QLearn::update_with_record`]: crate::QLearn::update_with_record
use std::collections::{
    hash_map::{Iter, Keys},
    HashMap,
};

/// Represents possible types of values stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, typically a metric.
    Scalar(f32),
}

/// A container of named [`RecordValue`]s.
///
/// ```rust
/// use border_tabular::record::{Record, RecordValue};
///
/// let record = Record::from_slice(&[
///     ("td_error", RecordValue::Scalar(0.5)),
///     ("q_value", RecordValue::Scalar(1.0)),
/// ]);
/// assert_eq!(record.get_scalar("td_error"), Some(0.5));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns an iterator over the keys in the record.
    pub fn keys(&self) -> Keys<'_, String, RecordValue> {
        self.0.keys()
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Gets a scalar value, or `None` if the key is absent.
    pub fn get_scalar(&self, k: &str) -> Option<f32> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Some(*v),
            None => None,
        }
    }
}
