use std::{fs, mem, path::Path};

use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    algo::tabular::{Hashable, SarsaAgent, SarsaConfig},
    env::Environment,
    error::Result,
    exploration::EpsilonGreedy,
    observer::Observer,
    sim::{self, Player},
    snapshot::Snapshot,
};

/// How long eligibility traces and the trajectory live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceScope {
    /// Every episode starts from fresh agents seeded with the saved values
    #[default]
    Episode,
    /// Agents are kept between episodes, traces keep accumulating across them
    Lifetime,
}

/// Configuration for the [`Trainer`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub agent: SarsaConfig,
    pub scope: TraceScope,
    /// Seed for every random draw the trainer and its agents make, from entropy if absent
    pub seed: Option<u64>,
}

impl TrainerConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }
}

/// The outcome of one trainer episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub episode: u32,
    /// Simulation ticks until every environment was terminal
    pub ticks: usize,
    /// Final score of each slot
    pub scores: Vec<f64>,
}

type Learner<E> = SarsaAgent<<E as Environment>::State, <E as Environment>::Action>;

/// Runs episode after episode, carrying learned values from one to the next
///
/// Each [`step`](Trainer::step) builds a fresh cohort of environments, pairs slot `i` with an
/// agent seeded from the values saved for slot `i`, runs the cohort to completion and saves
/// every agent's values back. Persistence is a separate operation so long runs can checkpoint
/// whenever they like.
pub struct Trainer<E: Environment, F> {
    config: TrainerConfig,
    make_cohort: F,
    snapshot: Snapshot<E::State, E::Action>,
    agents: Vec<Learner<E>>,
    episode: u32,
    rng: StdRng,
}

impl<E, F> Trainer<E, F>
where
    E: Environment,
    E::State: Hashable,
    E::Action: Hashable,
    F: FnMut() -> Vec<E>,
{
    /// **Errors** if the agent configuration is invalid
    pub fn new(config: TrainerConfig, make_cohort: F) -> Result<Self> {
        config.agent.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            make_cohort,
            snapshot: Snapshot::new(),
            agents: Vec::new(),
            episode: 0,
            rng,
        })
    }

    /// Continue from previously learned values
    pub fn with_snapshot(mut self, snapshot: Snapshot<E::State, E::Action>) -> Self {
        self.set_snapshot(snapshot);
        self
    }

    /// Replace the learned values, discarding any agents kept for [`TraceScope::Lifetime`]
    pub fn set_snapshot(&mut self, snapshot: Snapshot<E::State, E::Action>) {
        self.snapshot = snapshot;
        self.agents.clear();
    }

    pub fn snapshot(&self) -> &Snapshot<E::State, E::Action> {
        &self.snapshot
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Number of episodes run so far
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Run one episode
    pub fn step(&mut self) -> Result<EpisodeSummary> {
        self.step_with(&mut [])
    }

    /// Run one episode, notifying `observers` after every player's step
    pub fn step_with(
        &mut self,
        observers: &mut [&mut dyn Observer<E, Learner<E>>],
    ) -> Result<EpisodeSummary> {
        let envs = (self.make_cohort)();
        let exploration = self.config.agent.exploration(self.episode)?;
        let agents = self.agents_for(envs.len(), exploration);

        let mut players: Vec<_> = envs
            .into_iter()
            .zip(agents)
            .map(|(env, agent)| Player::new(env, agent))
            .collect();
        let ticks = sim::run(&mut players, observers);

        let mut scores = Vec::with_capacity(players.len());
        for (slot, player) in players.into_iter().enumerate() {
            let (env, agent) = player.into_parts();
            scores.push(env.score());
            match self.config.scope {
                TraceScope::Episode => self.snapshot.insert(slot, agent.into_q()),
                TraceScope::Lifetime => {
                    self.snapshot.insert(slot, agent.table().q().clone());
                    self.agents.push(agent);
                }
            }
        }

        let summary = EpisodeSummary {
            episode: self.episode,
            ticks,
            scores,
        };
        debug!(
            "episode {}: {} ticks, epsilon {}, scores {:?}",
            summary.episode,
            summary.ticks,
            exploration.epsilon(),
            summary.scores
        );
        self.episode += 1;
        Ok(summary)
    }

    /// Run `episodes` episodes
    pub fn train(&mut self, episodes: u32) -> Result<Vec<EpisodeSummary>> {
        (0..episodes).map(|_| self.step()).collect()
    }

    /// An agent that always exploits the values learned for `slot`, for replaying a policy
    pub fn greedy_agent(&mut self, slot: usize) -> Learner<E> {
        let q = self.snapshot.slot(slot).cloned().unwrap_or_default();
        SarsaAgent::with_exploration(
            &self.config.agent,
            EpsilonGreedy::greedy(),
            q,
            StdRng::seed_from_u64(self.rng.gen()),
        )
    }

    fn agents_for(&mut self, len: usize, exploration: EpsilonGreedy) -> Vec<Learner<E>> {
        let mut kept = mem::take(&mut self.agents);
        if kept.len() == len {
            for agent in kept.iter_mut() {
                agent.begin_episode(exploration);
            }
            return kept;
        }

        (0..len)
            .map(|slot| {
                let q = self.snapshot.slot(slot).cloned().unwrap_or_default();
                SarsaAgent::with_exploration(
                    &self.config.agent,
                    exploration,
                    q,
                    StdRng::seed_from_u64(self.rng.gen()),
                )
            })
            .collect()
    }
}

impl<E, F> Trainer<E, F>
where
    E: Environment,
    E::State: Hashable + Serialize + DeserializeOwned,
    E::Action: Hashable + Serialize + DeserializeOwned,
    F: FnMut() -> Vec<E>,
{
    /// Persist the learned values of every slot
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.snapshot.save(path)
    }

    /// Replace the learned values with those stored at `path`
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let snapshot = Snapshot::load(path)?;
        self.set_snapshot(snapshot);
        Ok(())
    }
}
