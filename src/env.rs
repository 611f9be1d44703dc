/// A turn-based environment an agent can be trained against
///
/// The environment owns its rules entirely: which actions are legal, when play stops, and how
/// the cumulative score evolves. The learning engine only ever sees states and actions as
/// opaque keys.
pub trait Environment {
    /// Identity of the environment's current configuration, used as a table key
    type State;

    /// An action that an agent can take to affect the environment
    type Action;

    /// Get the legal actions for the current state
    ///
    /// The returned vector is empty if and only if the environment is terminal.
    fn actions(&self) -> Vec<Self::Action>;

    /// Get the key identifying the current state
    fn state(&self) -> Self::State;

    /// Determine if the environment has reached a terminal state
    fn is_terminal(&self) -> bool;

    /// Cumulative score accrued since the environment was created
    fn score(&self) -> f64;

    /// Mutate the environment in response to an action
    ///
    /// Callers check [`is_terminal`](Environment::is_terminal) first, the result of applying an
    /// action to a terminal environment is left to the implementor.
    fn apply(&mut self, action: Self::Action);
}

#[cfg(test)]
pub(crate) mod tests {
    use std::fmt;

    use super::Environment;

    /// A counter that terminates once it reaches `len`
    ///
    /// Action `1` advances the counter and scores `1.0`, action `0` stays put and scores `-1.0`.
    #[derive(Debug, Clone)]
    pub struct MockEnv {
        pub pos: u32,
        pub len: u32,
        pub score: f64,
    }

    impl MockEnv {
        pub fn new(len: u32) -> Self {
            Self {
                pos: 0,
                len,
                score: 0.0,
            }
        }
    }

    impl fmt::Display for MockEnv {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let cells: String = (0..self.len)
                .map(|i| if i < self.pos { '#' } else { '.' })
                .collect();
            write!(f, "[{cells}]")
        }
    }

    impl Environment for MockEnv {
        type State = u32;
        type Action = u32;

        fn actions(&self) -> Vec<Self::Action> {
            if self.is_terminal() {
                vec![]
            } else {
                vec![0, 1]
            }
        }

        fn state(&self) -> Self::State {
            self.pos
        }

        fn is_terminal(&self) -> bool {
            self.pos >= self.len
        }

        fn score(&self) -> f64 {
            self.score
        }

        fn apply(&mut self, action: Self::Action) {
            if action == 1 {
                self.pos += 1;
                self.score += 1.0;
            } else {
                self.score -= 1.0;
            }
        }
    }

    #[test]
    fn mock_env_functional() {
        let mut env = MockEnv::new(2);
        assert_eq!(env.actions(), vec![0, 1], "Actions are correct");
        env.apply(0);
        env.apply(1);
        assert_eq!(env.state(), 1, "State advances");
        env.apply(1);
        assert!(env.is_terminal(), "Env is terminal");
        assert!(env.actions().is_empty(), "Terminal env has no actions");
        assert_eq!(env.score(), 1.0, "Score is cumulative");
    }
}
