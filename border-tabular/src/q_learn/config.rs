//! Configuration of [`QLearn`](super::QLearn) agent.
use crate::error::{Result, TabularError};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`QLearn`](super::QLearn) agent.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct QLearnConfig {
    /// Probability of taking a random action.
    pub epsilon: f64,

    /// Step size toward the Bellman target.
    pub alpha: f64,

    /// Weight on the value of the next state.
    pub gamma: f64,

    /// Seed of the random number generator. Seeded from the operating system if `None`.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for QLearnConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            alpha: 0.5,
            gamma: 0.9,
            seed: None,
        }
    }
}

/// Checks that a rate is finite and in `[0, 1]`.
pub(crate) fn check_rate(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TabularError::InvalidHyperparameter { name, value })
    }
}

impl QLearnConfig {
    /// Sets the exploration rate.
    pub fn epsilon(mut self, v: f64) -> Self {
        self.epsilon = v;
        self
    }

    /// Sets the learning rate.
    pub fn alpha(mut self, v: f64) -> Self {
        self.alpha = v;
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = Some(v);
        self
    }

    /// Checks that all three rates are in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        check_rate("epsilon", self.epsilon)?;
        check_rate("alpha", self.alpha)?;
        check_rate("gamma", self.gamma)?;
        Ok(())
    }

    /// Loads [`QLearnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(rdr)?;
        info!("Load config of QLearn agent from {}", path_.display());
        Ok(config)
    }

    /// Saves [`QLearnConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of QLearn agent into {}", path_.display());
        Ok(())
    }
}
