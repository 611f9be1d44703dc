use crate::env::Environment;

/// A decision-maker that can be driven by the [simulation loop](crate::sim::run)
///
/// One simulation step calls [`observe`](Agent::observe), then [`act`](Agent::act) if the
/// environment is not terminal. Once every pair in the cohort has stepped, each agent is told the
/// outcome through [`finish`](Agent::finish).
pub trait Agent<E: Environment> {
    /// Whatever the agent has learned, exported so a trainer can persist it
    type Snapshot;

    /// Record the state the environment is currently in
    fn observe(&mut self, state: E::State);

    /// Choose one of the legal `actions` for the last observed state
    ///
    /// `actions` is never empty, the loop does not ask for an action in a terminal state.
    fn act(&mut self, actions: &[E::Action]) -> E::Action;

    /// Receive the environment's state and cumulative score after the step
    fn finish(&mut self, state: E::State, score: f64);

    /// Borrow the learned state
    fn export(&self) -> &Self::Snapshot;
}
