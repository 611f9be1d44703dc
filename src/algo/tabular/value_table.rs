use std::collections::HashSet;

use rand::{rngs::StdRng, seq::SliceRandom, Rng};

use crate::exploration::{Choice, EpsilonGreedy};

use super::{Hashable, QTable, SarsaConfig, StateActionMap};

/// The outcome of an action selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<A> {
    pub action: A,
    /// `Q(state, action)` at the time of selection
    pub value: f64,
}

/// Action values and eligibility traces learned with backward-view SARSA(λ)
///
/// The table tracks a cursor of the last observed state and the action chosen in it. Each call
/// to [`update`](ValueTable::update) consumes that action, credits the temporal difference error
/// to every pair visited so far in proportion to its eligibility, and decays all eligibilities by
/// `γλ`.
///
/// ### Generics
/// - `S` - State key, only ever compared and hashed
/// - `A` - Action, only ever compared and hashed
/// - `R` - The random source used for exploration
pub struct ValueTable<S, A, R = StdRng> {
    q: QTable<S, A>,
    e: StateActionMap<S, A>,
    trajectory: Vec<(S, A)>,
    visited: HashSet<(S, A)>,
    last_state: Option<S>,
    last_action: Option<A>,
    exploration: EpsilonGreedy,
    alpha: f64,  // learning rate
    gamma: f64,  // discount factor
    lambda: f64, // trace decay
    rng: R,
}

impl<S: Hashable, A: Hashable, R: Rng> ValueTable<S, A, R> {
    /// Initialize a table from previously learned values, or an empty [`QTable`]
    ///
    /// Eligibility traces and the trajectory always start empty, even when `q` is reused.
    pub fn new(config: &SarsaConfig, exploration: EpsilonGreedy, q: QTable<S, A>, rng: R) -> Self {
        Self {
            q,
            e: StateActionMap::new(),
            trajectory: Vec::new(),
            visited: HashSet::new(),
            last_state: None,
            last_action: None,
            exploration,
            alpha: config.alpha,
            gamma: config.gamma,
            lambda: config.lambda,
            rng,
        }
    }

    /// Set the state that subsequent selections are made in
    pub fn observe(&mut self, state: S) {
        self.last_state = Some(state);
    }

    /// Record the action taken in the last observed state, to be credited by the next update
    pub fn record(&mut self, action: A) {
        self.last_action = Some(action);
    }

    /// Forget the last state and action without touching learned values or traces
    pub fn reset_cursor(&mut self) {
        self.last_state = None;
        self.last_action = None;
    }

    pub fn set_exploration(&mut self, exploration: EpsilonGreedy) {
        self.exploration = exploration;
    }

    /// Epsilon greedy selection among `candidates` in the last observed state
    ///
    /// Exploiting picks the highest valued candidate, ties going to the one listed first.
    /// Exploring picks uniformly at random. Does not modify any values.
    ///
    /// **Returns** `None` if `candidates` is empty or no state has been observed
    pub fn select(&mut self, candidates: &[A]) -> Option<Selection<A>> {
        let state = self.last_state.as_ref()?;
        choose(&self.q, self.exploration, &mut self.rng, state, candidates)
    }

    /// Apply one SARSA(λ) step for the pending action
    ///
    /// `lookahead` is the candidate set for the successor's action, which the agent supplies as
    /// every action it has ever seen rather than the actions legal in `new_state`.
    ///
    /// When no action has been recorded since the previous update, the score changed without the
    /// agent acting (another player moved a shared environment). A non-zero `delta_score` is then
    /// credited along the existing traces as is, with no lookahead and no new pair.
    pub fn update(&mut self, delta_score: f64, new_state: S, lookahead: &[A]) {
        let pending = match (self.last_state.take(), self.last_action.take()) {
            (Some(state), Some(action)) => Some((state, action)),
            _ => None,
        };

        match pending {
            Some(key) => {
                if self.visited.insert(key.clone()) {
                    self.trajectory.push(key.clone());
                }

                let next = choose(
                    &self.q,
                    self.exploration,
                    &mut self.rng,
                    &new_state,
                    lookahead,
                )
                .map_or(0.0, |s| s.value);
                let delta = delta_score + self.gamma * next - self.q.get(&key);

                self.e.add(&key, 1.0);
                self.backup(delta);
            }
            None if delta_score != 0.0 => self.backup(delta_score),
            None => {}
        }

        self.last_state = Some(new_state);
    }

    /// `Q(s,a) += α·δ·E(s,a)`, then `E(s,a) *= γλ`, for every visited pair
    fn backup(&mut self, delta: f64) {
        let decay = self.gamma * self.lambda;
        for pair in &self.trajectory {
            let eligibility = self.e.get(pair);
            self.q.add(pair, self.alpha * delta * eligibility);
            self.e.scale(pair, decay);
        }
    }

    pub fn q(&self) -> &QTable<S, A> {
        &self.q
    }

    pub fn into_q(self) -> QTable<S, A> {
        self.q
    }

    /// Current eligibility of a pair, `0.0` if it has never been visited
    pub fn eligibility(&self, key: &(S, A)) -> f64 {
        self.e.get(key)
    }

    /// Every distinct pair visited so far, in first-visit order
    pub fn trajectory(&self) -> &[(S, A)] {
        &self.trajectory
    }

    pub fn last_state(&self) -> Option<&S> {
        self.last_state.as_ref()
    }

    pub fn last_action(&self) -> Option<&A> {
        self.last_action.as_ref()
    }

    pub fn exploration(&self) -> EpsilonGreedy {
        self.exploration
    }
}

fn choose<S, A, R>(
    q: &QTable<S, A>,
    exploration: EpsilonGreedy,
    rng: &mut R,
    state: &S,
    candidates: &[A],
) -> Option<Selection<A>>
where
    S: Hashable,
    A: Hashable,
    R: Rng,
{
    if candidates.is_empty() {
        return None;
    }

    let value_of = |action: &A| q.get(&(state.clone(), action.clone()));

    match exploration.choose(rng) {
        Choice::Explore => candidates.choose(rng).map(|action| Selection {
            action: action.clone(),
            value: value_of(action),
        }),
        Choice::Exploit => {
            let mut best: Option<Selection<A>> = None;
            for action in candidates {
                let value = value_of(action);
                // strict comparison keeps the first listed action on ties
                if best.as_ref().map_or(true, |b| value > b.value) {
                    best = Some(Selection {
                        action: action.clone(),
                        value,
                    });
                }
            }
            best
        }
    }
}
