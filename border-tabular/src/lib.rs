#![warn(missing_docs)]
//! Tabular Q-learning agent.
//!
//! [`QLearn`] keeps an action-value table over hashable states and actions,
//! selects actions with an epsilon-greedy policy and applies the Bellman update
//! to observed transitions. The table can be saved as a lossless binary snapshot
//! together with a CSV export, and merged back from the snapshot.
//!
//! ```no_run
//! use border_tabular::{QLearn, QLearnConfig};
//!
//! # fn main() -> border_tabular::error::Result<()> {
//! let config = QLearnConfig::default().epsilon(0.1).alpha(0.5).gamma(0.9);
//! let mut agent = QLearn::<(i32, i32), String>::build(
//!     config,
//!     vec!["left".to_string(), "right".to_string()],
//! )?;
//!
//! let a = agent.select_action(&(0, 0));
//! agent.update(&(0, 0), &a, 1.0, &(0, 1));
//! agent.save_table("q_table")?;
//! # Ok(())
//! # }
//! ```
pub mod error;
pub mod record;

mod base;
pub use base::{Action, Policy, State};

mod q_table;
pub use q_table::QTable;

mod explorer;
pub use explorer::EpsilonGreedy;

mod q_learn;
pub use q_learn::{QLearn, QLearnConfig};

mod persist;
pub use persist::{LoadOutcome, SavedArtifacts, CSV_EXT, SNAPSHOT_EXT};
