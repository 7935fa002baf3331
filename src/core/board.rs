use anyhow::{bail, ensure};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::moves::{Move, BOARD_SIZE, SQUARES};
use super::player::{Cell, Player};

/// An Othello position: the 8x8 playing area surrounded by a ring of
/// `Cell::Outer` squares, so direction walks stop without bounds checks.
///
/// Boards are plain values; applying a move yields a new board.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// A board with every playable square empty
    pub fn empty() -> Self {
        let mut cells = [Cell::Outer; BOARD_SIZE];
        for sq in SQUARES.iter() {
            if let Some(i) = sq.index() {
                cells[i] = Cell::Empty;
            }
        }
        Self { cells }
    }

    /// Cell at a square; anything outside the grid reads as `Outer`
    pub fn get(&self, mv: Move) -> Cell {
        mv.index().map_or(Cell::Outer, |i| self.cells[i])
    }

    /// Copy of the board with one square replaced
    pub fn with(mut self, mv: Move, cell: Cell) -> Self {
        if let Some(i) = mv.index() {
            self.cells[i] = cell;
        }
        self
    }

    pub(crate) fn set(&mut self, mv: Move, cell: Cell) {
        if let Some(i) = mv.index() {
            self.cells[i] = cell;
        }
    }

    pub fn cells(&self) -> &[Cell; BOARD_SIZE] {
        &self.cells
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    pub fn discs(&self, player: Player) -> usize {
        self.count(player.cell())
    }

    /// Wire form: one character per cell, 100 characters
    pub fn encode(&self) -> String {
        self.cells.iter().map(|c| c.to_char()).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ensure!(
            s.chars().count() == BOARD_SIZE,
            "board must have {} cells, got {}",
            BOARD_SIZE,
            s.chars().count()
        );

        let mut board = Board::empty();
        for (i, c) in s.chars().enumerate() {
            let Some(cell) = Cell::from_char(c) else {
                bail!("invalid cell {:?} at {}", c, i);
            };
            let mv = Move(i as i32);
            if mv.is_playable() == (cell == Cell::Outer) {
                bail!("cell {:?} not allowed at {}", c, i);
            }
            board.set(mv, cell);
        }

        Ok(board)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.encode())
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Serde adapter for an optional board that travels as `""` when absent
pub mod board_or_empty {
    use super::Board;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(board: &Option<Board>, serializer: S) -> Result<S::Ok, S::Error> {
        match board {
            Some(board) => serializer.serialize_str(&board.encode()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Board>, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Ok(None);
        }
        s.parse().map(Some).map_err(de::Error::custom)
    }
}
