use std::fmt;

use serde::{Deserialize, Serialize};
use strum::VariantArray;

use crate::env::Environment;

#[derive(VariantArray, Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Move {
    // listed first, so untrained greedy agents head right
    Right,
    Left,
}

/// A one-dimensional walk where both ends are terminal
///
/// Entering a cell adds its value to the score. The default corridor puts a small penalty on the
/// left exit and a large reward behind two costly cells on the right, so a learner has to accept
/// a short-term loss to find the better end.
#[derive(Debug, Clone)]
pub struct Corridor {
    cells: Vec<f64>,
    pos: usize,
    score: f64,
}

impl Corridor {
    /// **Panics** if there are fewer than three cells or `start` is not an interior cell
    pub fn new(cells: Vec<f64>, start: usize) -> Self {
        assert!(cells.len() >= 3, "a corridor needs at least three cells");
        assert!(
            start > 0 && start < cells.len() - 1,
            "the start must be an interior cell"
        );
        Self {
            cells,
            pos: start,
            score: 0.0,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }
}

impl Default for Corridor {
    fn default() -> Self {
        Self::new(vec![-1.0, -1.0, -10.0, -10.0, 100.0], 2)
    }
}

impl fmt::Display for Corridor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.cells.len() {
            write!(f, "{}", if i == self.pos { "[@]" } else { "[ ]" })?;
        }
        Ok(())
    }
}

impl Environment for Corridor {
    type State = usize;
    type Action = Move;

    fn actions(&self) -> Vec<Self::Action> {
        if self.is_terminal() {
            vec![]
        } else {
            Move::VARIANTS.to_vec()
        }
    }

    fn state(&self) -> Self::State {
        self.pos
    }

    fn is_terminal(&self) -> bool {
        self.pos == 0 || self.pos == self.cells.len() - 1
    }

    fn score(&self) -> f64 {
        self.score
    }

    fn apply(&mut self, action: Self::Action) {
        self.pos = match action {
            Move::Left => self.pos - 1,
            Move::Right => self.pos + 1,
        };
        self.score += self.cells[self.pos];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        algo::SarsaConfig,
        decay::Schedule,
        gym::tests::replay,
        train::{Trainer, TrainerConfig},
    };

    #[test]
    fn walking_off_either_end() {
        let mut env = Corridor::default();
        assert_eq!(env.actions(), [Move::Right, Move::Left]);
        env.apply(Move::Left);
        env.apply(Move::Left);
        assert!(env.is_terminal());
        assert!(env.actions().is_empty());
        assert_eq!(env.score(), -2.0);

        let mut env = Corridor::default();
        env.apply(Move::Right);
        env.apply(Move::Right);
        assert!(env.is_terminal());
        assert_eq!(env.score(), 90.0);
        assert_eq!(env.to_string(), "[ ][ ][ ][ ][@]");
    }

    #[test]
    #[should_panic]
    fn start_on_an_exit_is_rejected() {
        Corridor::new(vec![0.0, 0.0, 0.0], 0);
    }

    #[test]
    fn learns_to_accept_the_toll_without_exploring() {
        let config = TrainerConfig {
            agent: SarsaConfig {
                epsilon: Schedule::constant(0.0),
                ..Default::default()
            },
            seed: Some(7),
            ..Default::default()
        };
        let mut trainer = Trainer::new(config, || vec![Corridor::default()]).unwrap();
        let summaries = trainer.train(5).unwrap();
        assert!(summaries.iter().all(|s| s.scores == [90.0]), "{summaries:?}");

        let q = trainer.snapshot().slot(0).unwrap();
        assert!(q.get(&(2, Move::Right)) > q.get(&(2, Move::Left)), "{q:?}");
        assert_eq!(replay(&mut trainer, Corridor::default(), 10), (2, 90.0));
    }
}
