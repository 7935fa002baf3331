//! Isolation of untrusted strategies.
//!
//! Every participant in a game owns a [`Sandbox`] handle. Automated
//! participants get a [`ProcessSandbox`] that runs the strategy in its own OS
//! process and enforces the per-move time budget from the supervisor side.
//! Human participants get a [`HumanSeat`], which follows the same state
//! machine but never launches anything, so teardown can treat every seat the
//! same way.
//!
//! # Lifecycle
//!
//! ```text
//! NotStarted ──start()──▶ Ready ──stop()──▶ Stopped
//!      └───────────────stop()───────────────▶┘
//! ```
//!
//! `stop()` is idempotent. A failed `start()` leaves the handle `Stopped`.

mod options;
mod process;

use std::time::Duration;

use crate::core::{Board, Move, Player};
use crate::error::SandboxError;

pub use options::SandboxOptions;
pub(crate) use options::millis;
pub use process::{LaunchSpec, ProcessSandbox};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandboxState {
    NotStarted,
    Ready,
    Stopped,
}

/// Answer to a move query.
///
/// `diagnostics` carries anything worth reporting about the query (captured
/// stderr, timeouts, crashes) and may be non-empty alongside a legal move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReply {
    pub mv: Move,
    pub diagnostics: String,
}

impl MoveReply {
    pub fn new(mv: Move) -> Self {
        Self {
            mv,
            diagnostics: String::new(),
        }
    }

    /// No move, with an explanation
    pub fn failed(diagnostics: impl Into<String>) -> Self {
        Self {
            mv: Move::NONE,
            diagnostics: diagnostics.into(),
        }
    }
}

/// Uniform handle over one participant's move source
pub trait Sandbox: Send {
    fn state(&self) -> SandboxState;

    /// Bring the sandbox up; may be called at most once
    fn start(&mut self) -> Result<(), SandboxError>;

    /// Ask for a move. Never fails: problems come back as `Move::NONE` plus
    /// diagnostics.
    fn get_move(&mut self, board: &Board, player: Player, time_limit: Duration) -> MoveReply;

    /// Tear the sandbox down. Safe to call in any state, any number of times.
    fn stop(&mut self);
}

/// Seat for a human participant; moves arrive through the runner's input
/// channel instead
#[derive(Debug)]
pub struct HumanSeat {
    state: SandboxState,
}

impl HumanSeat {
    pub fn new() -> Self {
        Self {
            state: SandboxState::NotStarted,
        }
    }
}

impl Default for HumanSeat {
    fn default() -> Self {
        Self::new()
    }
}

impl Sandbox for HumanSeat {
    fn state(&self) -> SandboxState {
        self.state
    }

    fn start(&mut self) -> Result<(), SandboxError> {
        if self.state != SandboxState::NotStarted {
            return Err(SandboxError::AlreadyStarted("human".into()));
        }
        self.state = SandboxState::Ready;
        Ok(())
    }

    fn get_move(&mut self, _board: &Board, _player: Player, _time_limit: Duration) -> MoveReply {
        MoveReply::failed("human seats do not compute moves")
    }

    fn stop(&mut self) {
        self.state = SandboxState::Stopped;
    }
}
