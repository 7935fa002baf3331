use anyhow::{bail, Result};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::ops::{Index, IndexMut, Not};
use std::str::FromStr;

/// Contents of a single square, including the boundary ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Black,
    White,
    Outer,
}

impl Cell {
    pub const fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Black => '@',
            Cell::White => 'o',
            Cell::Outer => '?',
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Empty),
            '@' => Some(Cell::Black),
            'o' => Some(Cell::White),
            '?' => Some(Cell::Outer),
            _ => None,
        }
    }

    /// The player owning a disc on this square, if any
    pub const fn player(self) -> Option<Player> {
        match self {
            Cell::Black => Some(Player::Black),
            Cell::White => Some(Player::White),
            Cell::Empty | Cell::Outer => None,
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.to_char())
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let c = char::deserialize(deserializer)?;
        Cell::from_char(c).ok_or_else(|| de::Error::custom(format!("invalid cell {:?}", c)))
    }
}

/// Player/side in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub fn all() -> [Player; 2] {
        [Player::Black, Player::White]
    }

    pub const fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    pub const fn cell(self) -> Cell {
        match self {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }

    pub const fn to_char(self) -> char {
        self.cell().to_char()
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        player.cell()
    }
}

impl FromStr for Player {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "@" | "black" | "B" => Ok(Player::Black),
            "o" | "white" | "W" => Ok(Player::White),
            _ => bail!("Unknown player: {}", s),
        }
    }
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

/// Array indexed by player
#[derive(Debug, Clone)]
pub struct PlayerArray<T> {
    pub values: [T; 2],
}

impl<T> PlayerArray<T> {
    pub fn new(black: T, white: T) -> Self {
        Self {
            values: [black, white],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.values.iter_mut()
    }
}

impl<T> Index<Player> for PlayerArray<T> {
    type Output = T;

    fn index(&self, index: Player) -> &Self::Output {
        &self.values[index.index()]
    }
}

impl<T> IndexMut<Player> for PlayerArray<T> {
    fn index_mut(&mut self, index: Player) -> &mut Self::Output {
        &mut self.values[index.index()]
    }
}
