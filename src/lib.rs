/// Agent contract
pub mod agent;

/// Implemented learning algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment contract
pub mod env;

/// Error type shared by the whole crate
pub mod error;

/// Exploration policies
pub mod exploration;

/// Listeners notified as a simulation runs
pub mod observer;

/// Lock-step simulation of agents in their environments
pub mod sim;

/// Persisted learned values
pub mod snapshot;

/// Episode-by-episode training
pub mod train;

/// Testing environments
#[cfg(feature = "gym")]
pub mod gym;

mod util;

pub use error::{Error, Result};
