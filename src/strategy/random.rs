use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::time::Instant;

use super::Strategy;
use crate::core::{legal_moves, Board, Move, Player};

/// Uniformly random legal move
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "seed" => {
                let seed = value.parse().context("invalid seed")?;
                self.rng = StdRng::seed_from_u64(seed);
            }
            _ => bail!("Unknown option: {}", name),
        }
        Ok(())
    }

    fn best_move(&mut self, board: &Board, player: Player, _deadline: Instant) -> Option<Move> {
        legal_moves(player, board).choose(&mut self.rng).copied()
    }
}
