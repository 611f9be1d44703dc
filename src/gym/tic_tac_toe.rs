use std::{cell::RefCell, fmt, rc::Rc};

use crate::env::Environment;

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    fn symbol(self) -> char {
        match self {
            Self::X => 'X',
            Self::O => 'O',
        }
    }
}

/// A 3x3 board, cells numbered row by row from `0` to `8`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Mark>; 9],
}

impl Board {
    pub fn cell(&self, index: usize) -> Option<Mark> {
        self.cells[index]
    }

    pub fn empty_cells(&self) -> Vec<usize> {
        (0..9).filter(|&i| self.cells[i].is_none()).collect()
    }

    /// **Panics** if the cell is taken
    pub fn place(&mut self, index: usize, mark: Mark) {
        assert!(self.cells[index].is_none(), "cell {index} is taken");
        self.cells[index] = Some(mark);
    }

    pub fn winner(&self) -> Option<Mark> {
        LINES.iter().find_map(|&[a, b, c]| {
            let mark = self.cells[a]?;
            (self.cells[b] == Some(mark) && self.cells[c] == Some(mark)).then_some(mark)
        })
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    /// Nine characters, `X`, `O` or `.` per cell
    pub fn key(&self) -> String {
        self.cells
            .iter()
            .map(|cell| cell.map_or('.', Mark::symbol))
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.key().as_bytes().chunks(3) {
            writeln!(f, "{}", String::from_utf8_lossy(row))?;
        }
        Ok(())
    }
}

/// One side of a game of tic-tac-toe
///
/// Both sides of a game share a board, so a cohort from [`TicTacToe::cohort`] is played
/// by two agents in lock-step: each tick `X` moves, then `O` answers on the updated board. A
/// side scores `1` for a win, `-1` for a loss and `0` otherwise, the loser learns of its loss
/// through the score even though it has no move left to make.
#[derive(Debug, Clone)]
pub struct TicTacToe {
    board: Rc<RefCell<Board>>,
    mark: Mark,
}

impl TicTacToe {
    pub fn new(board: Rc<RefCell<Board>>, mark: Mark) -> Self {
        Self { board, mark }
    }

    /// Both sides of a fresh game, `X` first
    pub fn cohort() -> Vec<Self> {
        let board = Rc::new(RefCell::new(Board::default()));
        vec![
            Self::new(Rc::clone(&board), Mark::X),
            Self::new(board, Mark::O),
        ]
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    pub fn board(&self) -> Board {
        self.board.borrow().clone()
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board.borrow())
    }
}

impl Environment for TicTacToe {
    type State = String;
    type Action = usize;

    fn actions(&self) -> Vec<Self::Action> {
        let board = self.board.borrow();
        if board.is_over() {
            vec![]
        } else {
            board.empty_cells()
        }
    }

    fn state(&self) -> Self::State {
        self.board.borrow().key()
    }

    fn is_terminal(&self) -> bool {
        self.board.borrow().is_over()
    }

    fn score(&self) -> f64 {
        match self.board.borrow().winner() {
            Some(mark) if mark == self.mark => 1.0,
            Some(_) => -1.0,
            None => 0.0,
        }
    }

    fn apply(&mut self, action: Self::Action) {
        self.board.borrow_mut().place(action, self.mark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::train::{Trainer, TrainerConfig};

    #[test]
    fn sides_share_the_board() {
        let mut cohort = TicTacToe::cohort();
        cohort[0].apply(4);
        assert_eq!(cohort[1].state(), "....X....");
        assert_eq!(cohort[1].actions(), [0, 1, 2, 3, 5, 6, 7, 8]);
        cohort[1].apply(0);
        assert_eq!(cohort[0].board().cell(0), Some(Mark::O));
        assert_eq!(cohort[0].to_string(), "O..\n.X.\n...\n");
    }

    #[test]
    fn winner_and_loser_are_scored() {
        let mut cohort = TicTacToe::cohort();
        for (side, cell) in [(0, 0), (1, 3), (0, 1), (1, 4), (0, 2)] {
            assert_eq!(cohort[0].score(), 0.0);
            cohort[side].apply(cell);
        }

        assert!(cohort.iter().all(Environment::is_terminal));
        assert!(cohort[1].actions().is_empty());
        assert_eq!(cohort[0].score(), 1.0);
        assert_eq!(cohort[1].score(), -1.0);
    }

    #[test]
    fn full_board_is_a_draw() {
        let mut board = Board::default();
        for (i, mark) in [
            Mark::X,
            Mark::O,
            Mark::X,
            Mark::X,
            Mark::O,
            Mark::O,
            Mark::O,
            Mark::X,
            Mark::X,
        ]
        .into_iter()
        .enumerate()
        {
            board.place(i, mark);
        }
        assert!(board.is_full());
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn self_play_is_zero_sum() {
        let config = TrainerConfig {
            seed: Some(5),
            ..Default::default()
        };
        let mut trainer = Trainer::new(config, TicTacToe::cohort).unwrap();
        for summary in trainer.train(300).unwrap() {
            assert!(summary.ticks <= 5, "X moves at most five times");
            assert_eq!(summary.scores.iter().sum::<f64>(), 0.0);
        }
        assert_eq!(trainer.snapshot().len(), 2);
        assert!(trainer.snapshot().iter().all(|(_, q)| !q.is_empty()));
    }
}
