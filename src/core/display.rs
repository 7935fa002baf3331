use colored::Colorize;
use std::fmt;

use super::{
    board::Board,
    moves::Move,
    player::{Cell, Player},
};

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..8u8 {
            write!(f, " {}", (b'a' + col) as char)?;
        }
        writeln!(f)?;

        for row in 1..=8 {
            write!(f, "{:2} ", row)?;
            for col in 1..=8 {
                write!(f, " {}", self.get(Move::new(row, col)))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Black => write!(f, "{}", "●".bright_blue()),
            Cell::White => write!(f, "{}", "○".bright_red()),
            Cell::Empty => write!(f, "·"),
            Cell::Outer => write!(f, "?"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Black => write!(f, "{}", "Black".bright_blue()),
            Player::White => write!(f, "{}", "White".bright_red()),
        }
    }
}
