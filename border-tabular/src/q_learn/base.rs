//! Tabular Q-learning agent.
use super::config::{check_rate, QLearnConfig};
use crate::{
    error::{Result, TabularError},
    persist,
    record::{Record, RecordValue},
    Action, EpsilonGreedy, LoadOutcome, Policy, QTable, SavedArtifacts, State,
};
use log::{info, trace};
use std::path::Path;

/// Tabular Q-learning agent.
///
/// Keeps an action-value table over `(S, A)` pairs, selects actions with an
/// epsilon-greedy policy and updates the table with the Bellman equation.
///
/// The action set is fixed at construction and is never empty.
#[derive(Debug, Clone)]
pub struct QLearn<S: State, A: Action> {
    q: QTable<S, A>,
    actions: Vec<A>,
    explorer: EpsilonGreedy,
    alpha: f64,
    gamma: f64,
}

impl<S: State, A: Action> QLearn<S, A> {
    /// Constructs the agent.
    ///
    /// Fails if `actions` is empty or a rate of `config` is outside `[0, 1]`.
    pub fn build(config: QLearnConfig, actions: Vec<A>) -> Result<Self> {
        if actions.is_empty() {
            return Err(TabularError::EmptyActionSet);
        }
        config.validate()?;
        info!(
            "Build QLearn agent: {} actions, epsilon = {}, alpha = {}, gamma = {}",
            actions.len(),
            config.epsilon,
            config.alpha,
            config.gamma
        );

        Ok(Self {
            q: QTable::new(),
            actions,
            explorer: EpsilonGreedy::from_seed(config.epsilon, config.seed),
            alpha: config.alpha,
            gamma: config.gamma,
        })
    }

    /// Constructs the agent with the given rates and a generator seeded from the
    /// operating system.
    pub fn new(actions: Vec<A>, epsilon: f64, alpha: f64, gamma: f64) -> Result<Self> {
        let config = QLearnConfig::default()
            .epsilon(epsilon)
            .alpha(alpha)
            .gamma(gamma);
        Self::build(config, actions)
    }

    /// Returns the value of `(state, action)`, or `0.0` if it has never been set.
    pub fn value(&self, state: &S, action: &A) -> f64 {
        self.q.get(state, action)
    }

    /// Selects an action with the epsilon-greedy policy.
    pub fn select_action(&mut self, state: &S) -> A {
        self.select_action_with_value(state).0
    }

    /// Selects an action with the epsilon-greedy policy and returns it together
    /// with its value.
    ///
    /// A random action is reported with its own value. A greedy action is drawn
    /// uniformly among the actions whose value equals the maximum, which is
    /// reported.
    pub fn select_action_with_value(&mut self, state: &S) -> (A, f64) {
        if self.explorer.is_random() {
            let a = draw(&mut self.explorer, &self.actions).clone();
            let v = self.value(state, &a);
            return (a, v);
        }

        let (best, max) = self.q.best_actions(state, &self.actions);
        let a = if best.is_empty() {
            // All values are NaN.
            draw(&mut self.explorer, &self.actions).clone()
        } else {
            (*draw(&mut self.explorer, &best)).clone()
        };
        (a, max)
    }

    /// Applies the Bellman update to `(state1, action1)` for the transition to `state2`.
    pub fn update(&mut self, state1: &S, action1: &A, reward: f64, state2: &S) {
        self.update_(state1, action1, reward, state2);
    }

    /// Applies the Bellman update and returns `q_value`, `td_error` and `max_next_q`.
    pub fn update_with_record(
        &mut self,
        state1: &S,
        action1: &A,
        reward: f64,
        state2: &S,
    ) -> Record {
        let (new, td_err, max_next) = self.update_(state1, action1, reward, state2);
        Record::from_slice(&[
            ("q_value", RecordValue::Scalar(new as f32)),
            ("td_error", RecordValue::Scalar(td_err as f32)),
            ("max_next_q", RecordValue::Scalar(max_next as f32)),
        ])
    }

    /// Returns the new value, the TD error and the maximum value of `state2`.
    fn update_(&mut self, state1: &S, action1: &A, reward: f64, state2: &S) -> (f64, f64, f64) {
        let current = self.value(state1, action1);
        let max_next = self.max_value(state2);
        let td_err = reward + self.gamma * max_next - current;
        let new = current + self.alpha * td_err;
        self.q.set(state1.clone(), action1.clone(), new);
        trace!("{:?}, {}: {} -> {}", state1, action1, current, new);
        (new, td_err, max_next)
    }

    fn max_value(&self, state: &S) -> f64 {
        match self.q.max_value(state, &self.actions) {
            Some(v) => v,
            None => unreachable!("the action set is checked to be non-empty at construction"),
        }
    }

    /// Saves the table as `<name>.bin` and `<name>.csv`.
    ///
    /// Both artifacts are attempted on every call. The table is not modified.
    pub fn save_table(&self, name: impl AsRef<Path>) -> Result<SavedArtifacts> {
        persist::save(&self.q, name.as_ref())
    }

    /// Merges the snapshot `<name>.bin` into the table.
    ///
    /// Entries of the snapshot overwrite entries of the same pairs, other entries
    /// are kept. If the snapshot does not exist, [`LoadOutcome::NotFound`] is
    /// returned. On any error the table is left unchanged.
    pub fn load_table(&mut self, name: impl AsRef<Path>) -> Result<LoadOutcome> {
        persist::load_into(&mut self.q, name.as_ref())
    }

    /// The action set.
    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    /// The action-value table.
    pub fn table(&self) -> &QTable<S, A> {
        &self.q
    }

    /// Exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.explorer.eps()
    }

    /// Sets the exploration rate.
    pub fn set_epsilon(&mut self, v: f64) -> Result<()> {
        check_rate("epsilon", v)?;
        self.explorer.set_eps(v);
        Ok(())
    }

    /// Learning rate.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Discount factor.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

/// Draws an item uniformly from a slice that is non-empty by construction.
fn draw<'a, T>(explorer: &mut EpsilonGreedy, items: &'a [T]) -> &'a T {
    match explorer.choose(items) {
        Some(x) => x,
        None => unreachable!("the action set is checked to be non-empty at construction"),
    }
}

impl<S: State, A: Action> Policy<S, A> for QLearn<S, A> {
    fn sample(&mut self, state: &S) -> A {
        self.select_action(state)
    }
}

#[cfg(test)]
mod test {
    #![allow(clippy::float_cmp)]
    use super::*;
    use std::collections::HashMap;

    type Agent = QLearn<(u8, u8), char>;

    fn agent(epsilon: f64, alpha: f64, gamma: f64) -> Agent {
        let config = QLearnConfig::default()
            .epsilon(epsilon)
            .alpha(alpha)
            .gamma(gamma)
            .seed(42);
        QLearn::build(config, vec!['A', 'B']).unwrap()
    }

    #[test]
    fn test_build_rejects_empty_actions() {
        let r = QLearn::<u8, char>::build(QLearnConfig::default(), vec![]);
        assert!(matches!(r, Err(TabularError::EmptyActionSet)));
    }

    #[test]
    fn test_build_rejects_out_of_range_rates() {
        assert!(QLearn::<u8, char>::new(vec!['A'], 1.1, 0.5, 0.9).is_err());
        assert!(QLearn::<u8, char>::new(vec!['A'], 0.1, -0.5, 0.9).is_err());
        assert!(QLearn::<u8, char>::new(vec!['A'], 0.1, 0.5, f64::INFINITY).is_err());
    }

    #[test]
    fn test_unvisited_value_is_zero() {
        let agent = agent(0.0, 0.5, 0.9);
        assert_eq!(agent.value(&(3, 4), &'A'), 0.0);
        assert_eq!(agent.value(&(3, 4), &'Z'), 0.0);
    }

    #[test]
    fn test_two_updates() {
        let mut agent = agent(0.0, 0.5, 0.9);
        let (s1, s2) = ((0, 0), (0, 1));

        agent.update(&s1, &'A', 10.0, &s2);
        assert_eq!(agent.value(&s1, &'A'), 5.0);

        agent.update(&s1, &'A', 10.0, &s2);
        assert_eq!(agent.value(&s1, &'A'), 7.5);
        assert_eq!(agent.table().len(), 1);
    }

    #[test]
    fn test_update_uses_best_next_value() {
        let mut agent = agent(0.0, 0.5, 0.9);
        let (s1, s2) = ((0, 0), (0, 1));
        agent.update(&s2, &'A', -2.0, &s1);
        agent.update(&s2, &'B', 4.0, &s1);
        let max_next = agent.value(&s2, &'B');
        assert_eq!(max_next, 2.0);

        let old = agent.value(&s1, &'A');
        let record = agent.update_with_record(&s1, &'A', 1.0, &s2);
        let expected = old + 0.5 * (1.0 + 0.9 * max_next - old);
        assert_eq!(agent.value(&s1, &'A'), expected);
        assert_eq!(record.get_scalar("q_value"), Some(expected as f32));
        assert_eq!(record.get_scalar("max_next_q"), Some(2.0));
        assert_eq!(record.get_scalar("td_error"), Some((1.0 + 0.9 * 2.0 - old) as f32));
    }

    #[test]
    fn test_update_matches_update_with_record() {
        let mut a1 = agent(0.0, 0.5, 0.9);
        let mut a2 = agent(0.0, 0.5, 0.9);
        let (s1, s2) = ((0, 0), (1, 0));
        for r in [1.0, -2.0, 0.5].iter() {
            a1.update(&s1, &'A', *r, &s2);
            let record = a2.update_with_record(&s1, &'A', *r, &s2);
            assert_eq!(a1.value(&s1, &'A'), a2.value(&s1, &'A'));
            assert_eq!(record.get_scalar("q_value"), Some(a1.value(&s1, &'A') as f32));
        }
        assert_eq!(a1.table(), a2.table());
    }

    #[test]
    fn test_update_self_transition() {
        // The next-state maximum is taken before the entry is overwritten.
        let mut agent = agent(0.0, 1.0, 0.5);
        let s = (1, 1);
        agent.update(&s, &'A', 2.0, &s);
        assert_eq!(agent.value(&s, &'A'), 2.0);
        agent.update(&s, &'A', 2.0, &s);
        assert_eq!(agent.value(&s, &'A'), 3.0);
    }

    #[test]
    fn test_greedy_selects_maximizer() {
        let mut agent = agent(0.0, 1.0, 0.0);
        let s = (0, 0);
        agent.update(&s, &'B', 1.0, &s);
        for _ in 0..100 {
            assert_eq!(agent.select_action_with_value(&s), ('B', 1.0));
        }
    }

    #[test]
    fn test_greedy_breaks_ties_among_maximizers() {
        let config = QLearnConfig::default().epsilon(0.0).alpha(1.0).gamma(0.0).seed(0);
        let mut agent = QLearn::<u8, char>::build(config, vec!['A', 'B', 'C']).unwrap();
        agent.update(&0, &'A', 1.0, &1);
        agent.update(&0, &'C', 1.0, &1);
        agent.update(&0, &'B', 0.5, &1);

        let mut counts = HashMap::new();
        for _ in 0..1000 {
            let (a, v) = agent.select_action_with_value(&0);
            assert_eq!(v, 1.0);
            *counts.entry(a).or_insert(0) += 1;
        }
        assert_eq!(counts.get(&'B'), None);
        assert!(counts[&'A'] > 400);
        assert!(counts[&'C'] > 400);
    }

    #[test]
    fn test_random_selection_reports_own_value() {
        let mut agent = agent(1.0, 1.0, 0.0);
        let s = (0, 0);
        agent.update(&s, &'A', 3.0, &s);
        for _ in 0..100 {
            let (a, v) = agent.select_action_with_value(&s);
            assert_eq!(v, agent.value(&s, &a));
        }
    }

    #[test]
    fn test_random_selection_is_uniform() {
        let mut agent = agent(1.0, 1.0, 0.0);
        let s = (0, 0);
        agent.update(&s, &'A', 3.0, &s);

        let n = 10_000;
        let n_a = (0..n).filter(|_| agent.select_action(&s) == 'A').count();
        let p = n_a as f64 / n as f64;
        assert!((p - 0.5).abs() < 0.03, "p = {}", p);
    }

    #[test]
    fn test_all_nan_falls_back_to_uniform() {
        let mut agent = agent(0.0, 1.0, 0.0);
        let s = (0, 0);
        agent.update(&s, &'A', f64::NAN, &s);
        agent.update(&s, &'B', f64::NAN, &s);
        let (a, v) = agent.select_action_with_value(&s);
        assert!(agent.actions().contains(&a));
        assert!(v.is_nan());
    }

    #[test]
    fn test_same_seed_same_choices() {
        let mut a1 = agent(0.5, 0.5, 0.9);
        let mut a2 = agent(0.5, 0.5, 0.9);
        for i in 0..100u8 {
            assert_eq!(a1.sample(&(i, 0)), a2.sample(&(i, 0)));
        }
    }

    #[test]
    fn test_set_epsilon() {
        let mut agent = agent(0.5, 0.5, 0.9);
        agent.set_epsilon(0.0).unwrap();
        assert_eq!(agent.epsilon(), 0.0);
        assert!(agent.set_epsilon(2.0).is_err());
        assert_eq!(agent.epsilon(), 0.0);
        assert_eq!(agent.alpha(), 0.5);
        assert_eq!(agent.gamma(), 0.9);
    }
}
