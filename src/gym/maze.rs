use std::{collections::VecDeque, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::VariantArray;

use crate::{
    env::Environment,
    error::{Error, Result},
};

/// Row and column of a tile
pub type Pos = (usize, usize);

const DEFAULT_LAYOUT: &str = "\
#########
#S..#...#
###.#.#.#
#...#.#.#
#.###.#.#
#.....#G#
#########";

#[derive(VariantArray, Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

/// A grid maze walked from `S` to `G`
///
/// Every direction is offered on every step. Moving into a wall or off the grid leaves the
/// walker in place, which still costs the step. Each step scores `-1` except the one entering
/// the goal, which scores `100`.
#[derive(Debug, Clone)]
pub struct Maze {
    walls: Vec<Vec<bool>>,
    start: Pos,
    goal: Pos,
    pos: Pos,
    score: f64,
}

impl Maze {
    /// Parse a layout of `#` walls, `.` floor, one `S` start and one `G` goal
    ///
    /// Blank lines are ignored, every other row must have the same width.
    pub fn parse(layout: &str) -> Result<Self> {
        let mut walls: Vec<Vec<bool>> = Vec::new();
        let mut start = None;
        let mut goal = None;

        for line in layout.lines().map(str::trim_end).filter(|l| !l.is_empty()) {
            let row = walls.len();
            let mut tiles = Vec::with_capacity(line.len());
            for (col, c) in line.chars().enumerate() {
                match c {
                    '#' => tiles.push(true),
                    '.' => tiles.push(false),
                    'S' | 'G' => {
                        let slot = if c == 'S' { &mut start } else { &mut goal };
                        if slot.replace((row, col)).is_some() {
                            return Err(Error::InvalidMaze(format!("more than one `{c}`")));
                        }
                        tiles.push(false);
                    }
                    _ => {
                        return Err(Error::InvalidMaze(format!(
                            "unexpected {c:?} at row {row}, column {col}"
                        )))
                    }
                }
            }

            if let Some(first) = walls.first() {
                if first.len() != tiles.len() {
                    return Err(Error::InvalidMaze(format!(
                        "row {row} is {} wide, expected {}",
                        tiles.len(),
                        first.len()
                    )));
                }
            }
            walls.push(tiles);
        }

        let start = start.ok_or_else(|| Error::InvalidMaze("no start `S`".into()))?;
        let goal = goal.ok_or_else(|| Error::InvalidMaze("no goal `G`".into()))?;
        Ok(Self {
            walls,
            start,
            goal,
            pos: start,
            score: 0.0,
        })
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn goal(&self) -> Pos {
        self.goal
    }

    /// Fewest steps from the start to the goal, if the goal is reachable
    pub fn shortest_path(&self) -> Option<usize> {
        let mut dist = vec![vec![None; self.width()]; self.walls.len()];
        dist[self.start.0][self.start.1] = Some(0);
        let mut queue = VecDeque::from([self.start]);

        while let Some(pos) = queue.pop_front() {
            let d = dist[pos.0][pos.1]?;
            if pos == self.goal {
                return Some(d);
            }
            for &dir in Dir::VARIANTS {
                let next = self.neighbor(pos, dir);
                if dist[next.0][next.1].is_none() {
                    dist[next.0][next.1] = Some(d + 1);
                    queue.push_back(next);
                }
            }
        }

        None
    }

    fn width(&self) -> usize {
        self.walls.first().map_or(0, Vec::len)
    }

    fn is_open(&self, (row, col): Pos) -> bool {
        self.walls
            .get(row)
            .and_then(|tiles| tiles.get(col))
            .is_some_and(|&wall| !wall)
    }

    /// Where a step in `dir` from `pos` ends up
    fn neighbor(&self, (row, col): Pos, dir: Dir) -> Pos {
        let next = match dir {
            Dir::Up => row.checked_sub(1).map(|r| (r, col)),
            Dir::Down => Some((row + 1, col)),
            Dir::Left => col.checked_sub(1).map(|c| (row, c)),
            Dir::Right => Some((row, col + 1)),
        };
        next.filter(|&p| self.is_open(p)).unwrap_or((row, col))
    }
}

impl Default for Maze {
    fn default() -> Self {
        Self::parse(DEFAULT_LAYOUT).expect("default layout is valid")
    }
}

impl FromStr for Maze {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, tiles) in self.walls.iter().enumerate() {
            for (col, &wall) in tiles.iter().enumerate() {
                let c = if (row, col) == self.pos {
                    '@'
                } else if (row, col) == self.goal {
                    'G'
                } else if wall {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Environment for Maze {
    type State = Pos;
    type Action = Dir;

    fn actions(&self) -> Vec<Self::Action> {
        if self.is_terminal() {
            vec![]
        } else {
            Dir::VARIANTS.to_vec()
        }
    }

    fn state(&self) -> Self::State {
        self.pos
    }

    fn is_terminal(&self) -> bool {
        self.pos == self.goal
    }

    fn score(&self) -> f64 {
        self.score
    }

    fn apply(&mut self, action: Self::Action) {
        self.pos = self.neighbor(self.pos, action);
        self.score += if self.pos == self.goal { 100.0 } else { -1.0 };
    }
}
