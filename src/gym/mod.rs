pub mod corridor;
pub mod maze;
pub mod tic_tac_toe;

pub use corridor::Corridor;
pub use maze::Maze;
pub use tic_tac_toe::TicTacToe;

#[cfg(test)]
pub(crate) mod tests {
    use crate::{
        algo::tabular::Hashable,
        env::Environment,
        sim::Player,
        train::Trainer,
    };

    /// Play slot 0's greedy policy on `env` for at most `limit` steps
    ///
    /// **Returns** the number of steps taken and the final score
    pub fn replay<E, F>(trainer: &mut Trainer<E, F>, env: E, limit: usize) -> (usize, f64)
    where
        E: Environment,
        E::State: Hashable,
        E::Action: Hashable,
        F: FnMut() -> Vec<E>,
    {
        let mut player = Player::new(env, trainer.greedy_agent(0));
        let mut steps = 0;
        while steps < limit && player.step() {
            player.complete();
            steps += 1;
        }
        (steps, player.env().score())
    }
}
