use rand::{rngs::StdRng, Rng};
use serde::{Deserialize, Serialize};

use crate::{
    agent::Agent,
    decay::Schedule,
    ensure_interval,
    env::Environment,
    error::Result,
    exploration::EpsilonGreedy,
};

use super::{Hashable, QTable, ValueTable};

/// Configuration for the [`SarsaAgent`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SarsaConfig {
    /// Learning rate
    ///
    /// **Default**: `0.1`
    pub alpha: f64,
    /// Discount factor
    ///
    /// **Default**: `0.9`
    pub gamma: f64,
    /// Eligibility trace decay
    ///
    /// **Default**: `0.9`
    pub lambda: f64,
    /// Exploration probability as a function of the episode number
    ///
    /// **Default**: constant `0.1`
    pub epsilon: Schedule,
}

impl Default for SarsaConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
            lambda: 0.9,
            epsilon: Schedule::default(),
        }
    }
}

impl SarsaConfig {
    /// **Errors** if `alpha`, `gamma` or `lambda` is not in the interval `[0,1]`, or if the
    /// epsilon schedule can leave that interval
    pub fn validate(&self) -> Result<()> {
        let &Self {
            alpha,
            gamma,
            lambda,
            epsilon,
        } = self;
        ensure_interval!(alpha, 0.0, 1.0);
        ensure_interval!(gamma, 0.0, 1.0);
        ensure_interval!(lambda, 0.0, 1.0);
        epsilon.validate()
    }

    /// The exploration policy in effect for a given episode
    pub fn exploration(&self, episode: u32) -> Result<EpsilonGreedy> {
        EpsilonGreedy::new(self.epsilon.evaluate(episode as f64))
    }
}

/// An agent that learns with a SARSA(λ) [`ValueTable`]
///
/// Besides the table, the agent keeps the cumulative score it last saw, so each step is credited
/// with the score difference, and the set of every action it has ever been offered, which is the
/// candidate set for the lookahead in each update.
pub struct SarsaAgent<S, A, R = StdRng> {
    table: ValueTable<S, A, R>,
    available: Vec<A>,
    score: f64,
}

impl<S: Hashable, A: Hashable, R: Rng> SarsaAgent<S, A, R> {
    /// Initialize an agent from previously learned values, exploring as `config` dictates for
    /// `episode`
    ///
    /// **Errors** if `config` is invalid
    pub fn new(config: &SarsaConfig, q: QTable<S, A>, episode: u32, rng: R) -> Result<Self> {
        config.validate()?;
        let exploration = config.exploration(episode)?;
        Ok(Self::with_exploration(config, exploration, q, rng))
    }

    /// Initialize an agent with an explicit exploration policy, bypassing the schedule
    pub fn with_exploration(
        config: &SarsaConfig,
        exploration: EpsilonGreedy,
        q: QTable<S, A>,
        rng: R,
    ) -> Self {
        Self {
            table: ValueTable::new(config, exploration, q, rng),
            available: Vec::new(),
            score: 0.0,
        }
    }

    /// Prepare for a fresh environment while keeping traces, trajectory and seen actions
    pub fn begin_episode(&mut self, exploration: EpsilonGreedy) {
        self.table.reset_cursor();
        self.table.set_exploration(exploration);
        self.score = 0.0;
    }

    pub fn table(&self) -> &ValueTable<S, A, R> {
        &self.table
    }

    /// Every action ever offered to the agent, in the order first seen
    pub fn available_actions(&self) -> &[A] {
        &self.available
    }

    /// The cumulative score recorded at the last [`finish`](Agent::finish)
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn into_q(self) -> QTable<S, A> {
        self.table.into_q()
    }
}

impl<E, R> Agent<E> for SarsaAgent<E::State, E::Action, R>
where
    E: Environment,
    E::State: Hashable,
    E::Action: Hashable,
    R: Rng,
{
    type Snapshot = QTable<E::State, E::Action>;

    fn observe(&mut self, state: E::State) {
        self.table.observe(state);
    }

    fn act(&mut self, actions: &[E::Action]) -> E::Action {
        for action in actions {
            if !self.available.contains(action) {
                self.available.push(action.clone());
            }
        }

        let action = self
            .table
            .select(actions)
            .expect("`act` follows `observe` and is given at least one action")
            .action;
        self.table.record(action.clone());
        action
    }

    fn finish(&mut self, state: E::State, score: f64) {
        self.table
            .update(score - self.score, state, &self.available);
        self.score = score;
    }

    fn export(&self) -> &Self::Snapshot {
        self.table.q()
    }
}
