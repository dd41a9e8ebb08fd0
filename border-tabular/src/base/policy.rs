//! Policy.
use super::{Action, State};

/// A policy on an environment.
///
/// Policy is a mapping from a state to an action.
/// The mapping can be either of deterministic or stochastic.
pub trait Policy<S: State, A: Action> {
    /// Sample an action given a state.
    fn sample(&mut self, state: &S) -> A;
}
