/// Tabular learners: the SARSA(λ) value table and the agent built on it
pub mod tabular;

pub use tabular::{QTable, SarsaAgent, SarsaConfig, ValueTable};
