use crate::env::Environment;

#[cfg(feature = "viz")]
mod console;
mod tally;

#[cfg(feature = "viz")]
pub use console::Console;
pub use tally::Tally;

/// A side-effect-only listener notified after every player's step
///
/// Observers receive shared references, they can render or count but never change the
/// environment or the agent.
pub trait Observer<E: Environment, A> {
    fn notify(&mut self, env: &E, agent: &A);
}
