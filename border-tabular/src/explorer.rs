//! Exploration strategy of the tabular agent.
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

/// Epsilon-greedy explorer.
///
/// Takes a random action with probability `eps` and the greedy action
/// otherwise. The explorer owns the random number generator of the agent, so
/// two explorers built with the same seed make the same decisions.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    eps: f64,
    rng: StdRng,
}

impl EpsilonGreedy {
    /// Constructs epsilon-greedy explorer seeded from the operating system.
    pub fn new(eps: f64) -> Self {
        Self {
            eps,
            rng: StdRng::from_entropy(),
        }
    }

    /// Constructs epsilon-greedy explorer with a fixed seed.
    pub fn with_seed(eps: f64, seed: u64) -> Self {
        Self {
            eps,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Constructs the explorer from an optional seed.
    pub fn from_seed(eps: f64, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(eps, seed),
            None => Self::new(eps),
        }
    }

    /// Exploration rate.
    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// Set the exploration rate.
    pub fn set_eps(&mut self, v: f64) {
        self.eps = v;
    }

    /// Returns `true` if the next action should be drawn at random.
    pub fn is_random(&mut self) -> bool {
        // `gen::<f64>()` is in [0, 1), so eps = 1 always explores and eps = 0 never does.
        self.rng.gen::<f64>() < self.eps
    }

    /// Draws an item uniformly.
    ///
    /// Returns `None` if `items` is empty.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }
}
