use log::trace;

use crate::{agent::Agent, env::Environment, observer::Observer};

/// One environment bound to the agent acting in it
pub struct Player<E, A> {
    env: E,
    agent: A,
}

impl<E: Environment, A: Agent<E>> Player<E, A> {
    pub fn new(env: E, agent: A) -> Self {
        Self { env, agent }
    }

    /// Show the agent the current state and, unless the environment is terminal, apply the
    /// action it chooses
    ///
    /// **Returns** `true` if an action was applied
    pub fn step(&mut self) -> bool {
        self.agent.observe(self.env.state());
        if self.env.is_terminal() {
            return false;
        }

        let action = self.agent.act(&self.env.actions());
        self.env.apply(action);
        true
    }

    /// Tell the agent the state and score the last step led to
    pub fn complete(&mut self) {
        self.agent.finish(self.env.state(), self.env.score());
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    pub fn into_parts(self) -> (E, A) {
        (self.env, self.agent)
    }
}

/// Advance a cohort of players in lock-step until every environment is terminal
///
/// Each tick, every player in turn observes, acts and is shown to every observer before the next
/// player moves, so later players see the moves of earlier ones within the same tick. Once all
/// players have stepped, each agent receives [`finish`](Agent::finish).
///
/// There is no iteration limit, an environment that never terminates loops forever.
///
/// **Returns** the number of ticks run
pub fn run<E, A>(players: &mut [Player<E, A>], observers: &mut [&mut dyn Observer<E, A>]) -> usize
where
    E: Environment,
    A: Agent<E>,
{
    let mut ticks = 0;
    while !players.iter().all(|p| p.env.is_terminal()) {
        for player in players.iter_mut() {
            player.step();
            for observer in observers.iter_mut() {
                observer.notify(&player.env, &player.agent);
            }
        }

        for player in players.iter_mut() {
            player.complete();
        }

        ticks += 1;
        trace!(
            "tick {ticks}: {} of {} players live",
            players.iter().filter(|p| !p.env.is_terminal()).count(),
            players.len()
        );
    }

    ticks
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{env::tests::MockEnv, observer::Tally};

    /// Always advances, logging every call it receives
    struct Scripted {
        id: usize,
        calls: Rc<RefCell<Vec<String>>>,
        finished: Vec<(u32, f64)>,
    }

    impl Scripted {
        fn new(id: usize, calls: &Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                id,
                calls: Rc::clone(calls),
                finished: Vec::new(),
            }
        }
    }

    impl Agent<MockEnv> for Scripted {
        type Snapshot = Vec<(u32, f64)>;

        fn observe(&mut self, state: u32) {
            self.calls.borrow_mut().push(format!("{} observe {state}", self.id));
        }

        fn act(&mut self, _actions: &[u32]) -> u32 {
            self.calls.borrow_mut().push(format!("{} act", self.id));
            1
        }

        fn finish(&mut self, state: u32, score: f64) {
            self.calls.borrow_mut().push(format!("{} finish {state}", self.id));
            self.finished.push((state, score));
        }

        fn export(&self) -> &Self::Snapshot {
            &self.finished
        }
    }

    #[test]
    fn empty_cohort_runs_zero_ticks() {
        let mut players: Vec<Player<MockEnv, Scripted>> = vec![];
        assert_eq!(run(&mut players, &mut []), 0);
    }

    #[test]
    fn interleaves_steps_then_finishes_all() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut players = vec![
            Player::new(MockEnv::new(1), Scripted::new(0, &calls)),
            Player::new(MockEnv::new(1), Scripted::new(1, &calls)),
        ];

        let ticks = run(&mut players, &mut []);

        assert_eq!(ticks, 1);
        assert_eq!(
            *calls.borrow(),
            [
                "0 observe 0",
                "0 act",
                "1 observe 0",
                "1 act",
                "0 finish 1",
                "1 finish 1",
            ]
        );
    }

    #[test]
    fn runs_until_every_environment_is_terminal() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut players = vec![
            Player::new(MockEnv::new(1), Scripted::new(0, &calls)),
            Player::new(MockEnv::new(3), Scripted::new(1, &calls)),
        ];
        let mut tally = Tally::default();
        let mut observers: [&mut dyn Observer<MockEnv, Scripted>; 1] = [&mut tally];

        let ticks = run(&mut players, &mut observers);

        assert_eq!(ticks, 3);
        assert_eq!(tally.notifications(), 6, "Every pair is shown every tick");
        assert_eq!(tally.terminal(), 4, "Pair 0 is terminal from the first tick on");

        let (_, short) = players.remove(0).into_parts();
        assert_eq!(
            short.finished,
            [(1, 1.0), (1, 1.0), (1, 1.0)],
            "A finished pair keeps receiving its final outcome"
        );
        assert_eq!(players[0].env().score(), 3.0);
    }
}
