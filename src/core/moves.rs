use anyhow::{bail, Context};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Side length of the grid, including the boundary ring
pub const BOARD_LEN: usize = 10;
pub const BOARD_SIZE: usize = BOARD_LEN * BOARD_LEN;

/// Index offsets to the eight neighbouring squares
pub const DIRECTIONS: [i32; 8] = [-11, -10, -9, -1, 1, 9, 10, 11];

lazy_static! {
    /// Every playable square, in ascending order
    pub static ref SQUARES: Vec<Move> = (0..BOARD_SIZE as i32)
        .map(Move)
        .filter(|mv| mv.is_playable())
        .collect();
}

/// A square index into the 10x10 grid
///
/// Any integer is representable so that untrusted input can be carried
/// around and rejected by the legality check rather than at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Move(pub i32);

impl Move {
    /// Sentinel for "no move was produced"
    pub const NONE: Move = Move(-1);

    pub const fn new(row: i32, col: i32) -> Self {
        Move(row * BOARD_LEN as i32 + col)
    }

    pub const fn row(&self) -> i32 {
        self.0 / BOARD_LEN as i32
    }

    pub const fn col(&self) -> i32 {
        self.0 % BOARD_LEN as i32
    }

    /// Grid index if the move lies inside the 10x10 grid
    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.0).ok().filter(|&i| i < BOARD_SIZE)
    }

    /// Whether the move names one of the 64 interior squares
    pub const fn is_playable(&self) -> bool {
        self.0 >= 0
            && (self.0 as usize) < BOARD_SIZE
            && self.row() >= 1
            && self.row() <= 8
            && self.col() >= 1
            && self.col() <= 8
    }
}

impl From<i32> for Move {
    fn from(index: i32) -> Self {
        Move(index)
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;

    /// Accepts a raw square index (`34`) or an algebraic name (`d3`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<i32>() {
            return Ok(Move(index));
        }

        let mut chars = s.chars();
        let file = chars.next().context("empty move")?.to_ascii_lowercase();
        let rank: i32 = chars.as_str().parse().context("invalid move rank")?;

        if !('a'..='h').contains(&file) || !(1..=8).contains(&rank) {
            bail!("invalid move {}", s);
        }

        Ok(Move::new(rank, (file as u8 - b'a') as i32 + 1))
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
