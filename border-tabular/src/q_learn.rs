//! Tabular Q-learning agent.
mod base;
mod config;
pub use base::QLearn;
pub use config::QLearnConfig;
