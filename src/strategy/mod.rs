//! Built-in move selection logic, hosted inside strategy processes

mod greedy;
mod positional;
mod random;

use anyhow::{bail, Result};
use std::time::Instant;

use crate::core::{Board, Move, Player};

pub use greedy::GreedyStrategy;
pub use positional::PositionalStrategy;
pub use random::RandomStrategy;

/// Names of the strategies this binary can host
pub const BUILTIN: [&str; 3] = ["random", "greedy", "positional"];

/// Decision logic for one side of a game
pub trait Strategy: Send {
    fn name(&self) -> &'static str;

    fn set_option(&mut self, name: &str, _value: &str) -> Result<()> {
        bail!("Unknown option: {}", name)
    }

    /// Pick a move for `player`, finishing before `deadline` where possible.
    /// `None` when the player has no legal move.
    fn best_move(&mut self, board: &Board, player: Player, deadline: Instant) -> Option<Move>;
}

pub fn by_name(name: &str) -> Option<Box<dyn Strategy>> {
    match name {
        "random" => Some(Box::new(RandomStrategy::new())),
        "greedy" => Some(Box::new(GreedyStrategy)),
        "positional" => Some(Box::new(PositionalStrategy::default())),
        _ => None,
    }
}
