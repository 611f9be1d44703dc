use crate::env::Environment;

use super::Observer;

/// Counts notifications and tracks the best score seen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    notifications: usize,
    terminal: usize,
    best: Option<f64>,
}

impl Tally {
    /// Total notifications received
    pub fn notifications(&self) -> usize {
        self.notifications
    }

    /// Notifications received for terminal environments
    pub fn terminal(&self) -> usize {
        self.terminal
    }

    /// The highest score among all notified environments
    pub fn best(&self) -> Option<f64> {
        self.best
    }
}

impl<E: Environment, A> Observer<E, A> for Tally {
    fn notify(&mut self, env: &E, _agent: &A) {
        self.notifications += 1;
        if env.is_terminal() {
            self.terminal += 1;
        }
        let score = env.score();
        self.best = Some(self.best.map_or(score, |best| best.max(score)));
    }
}
