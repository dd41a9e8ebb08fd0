#![allow(clippy::float_cmp)]
//! Action-value table.
use crate::{Action, State};
use serde::{Deserialize, Serialize};
use std::{
    collections::{hash_map::Iter, HashMap},
    iter::FromIterator,
};

/// Action-value table mapping (state, action) pairs to Q-values.
///
/// The table is logically total: a pair that has never been set has the value
/// `0.0`. Entries are only inserted or overwritten, never removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "S: State, A: Action")]
pub struct QTable<S: State, A: Action> {
    q: HashMap<(S, A), f64>,
}

impl<S: State, A: Action> Default for QTable<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, A: Action> QTable<S, A> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self { q: HashMap::new() }
    }

    /// Returns the value of the pair, or `0.0` if it is not in the table.
    pub fn get(&self, state: &S, action: &A) -> f64 {
        // Keys are owned tuples, so the lookup key is built from clones.
        self.q
            .get(&(state.clone(), action.clone()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Sets the value of the pair.
    pub fn set(&mut self, state: S, action: A, value: f64) {
        self.q.insert((state, action), value);
    }

    /// Maximum of the values of `state` over `actions`.
    ///
    /// Returns `None` if `actions` is empty. NaN values are ignored unless all
    /// values are NaN, in which case the result is NaN.
    pub fn max_value(&self, state: &S, actions: &[A]) -> Option<f64> {
        if actions.is_empty() {
            return None;
        }
        let max = actions
            .iter()
            .map(|a| self.get(state, a))
            .fold(f64::NAN, f64::max);
        Some(max)
    }

    /// Actions attaining the maximum value in `state`, with that value.
    ///
    /// Ties are detected with exact floating-point equality. The returned
    /// actions keep the order of `actions`. The list is empty if `actions` is
    /// empty or every value is NaN.
    pub fn best_actions<'a>(&self, state: &S, actions: &'a [A]) -> (Vec<&'a A>, f64) {
        let values = actions
            .iter()
            .map(|a| self.get(state, a))
            .collect::<Vec<_>>();
        let max = values.iter().copied().fold(f64::NAN, f64::max);
        let best = actions
            .iter()
            .zip(values.iter())
            .filter(|(_, v)| **v == max)
            .map(|(a, _)| a)
            .collect();
        (best, max)
    }

    /// Inserts all entries of `other`, overwriting the values of the same pairs.
    ///
    /// Returns the number of merged entries.
    pub fn merge(&mut self, other: QTable<S, A>) -> usize {
        let n = other.q.len();
        self.q.extend(other.q);
        n
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.q.len()
    }

    /// Returns `true` if no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    /// Iterates over the stored entries in arbitrary order.
    pub fn iter(&self) -> Iter<'_, (S, A), f64> {
        self.q.iter()
    }
}

impl<S: State, A: Action> FromIterator<((S, A), f64)> for QTable<S, A> {
    fn from_iter<I: IntoIterator<Item = ((S, A), f64)>>(iter: I) -> Self {
        Self {
            q: iter.into_iter().collect(),
        }
    }
}

impl<S: State, A: Action> IntoIterator for QTable<S, A> {
    type Item = ((S, A), f64);
    type IntoIter = std::collections::hash_map::IntoIter<(S, A), f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.q.into_iter()
    }
}
