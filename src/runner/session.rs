use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};

use crate::core::{initial_board, Board, Cell, Player, PlayerArray};
use crate::registry::Participant;

/// Lifecycle of a session.
///
/// Participants are resolved before a session exists, so a new session is
/// already past name resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Both sides resolved, nothing started yet
    Init,
    /// Sandboxes are being started
    StartingParticipants,
    Playing,
    NaturalEnd,
    Forfeited,
    Cancelled,
    CleanedUp,
}

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Nobody could move. `winner` is `Cell::Empty` for a tie.
    NaturalEnd { winner: Cell },
    /// The other side made an illegal move or none at all
    Forfeited { winner: Player },
    /// The quit flag was raised
    Cancelled,
    /// Configuration problem, startup failure or internal error
    Aborted(String),
}

impl Termination {
    /// Whether cleanup has to report the end itself
    pub fn is_abnormal(&self) -> bool {
        matches!(self, Termination::Cancelled | Termination::Aborted(_))
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::NaturalEnd { winner: Cell::Empty } => write!(f, "tie"),
            Termination::NaturalEnd { winner } => write!(f, "{} wins", winner.to_char()),
            Termination::Forfeited { winner } => write!(f, "{} wins by forfeit", winner.to_char()),
            Termination::Cancelled => write!(f, "cancelled"),
            Termination::Aborted(reason) => write!(f, "aborted: {}", reason),
        }
    }
}

/// State of one game, owned by the thread running it
pub struct GameSession {
    board: Board,
    to_move: Option<Player>,
    participants: PlayerArray<Participant>,
    time_limit: Duration,
    phase: Phase,
    cleaned_up: bool,
}

impl GameSession {
    pub fn new(participants: PlayerArray<Participant>, time_limit: Duration) -> Self {
        Self {
            board: initial_board(),
            to_move: Some(Player::Black),
            participants,
            time_limit,
            phase: Phase::Init,
            cleaned_up: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Option<Player> {
        self.to_move
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn participant(&self, player: Player) -> &Participant {
        &self.participants[player]
    }

    pub fn participant_mut(&mut self, player: Player) -> &mut Participant {
        &mut self.participants[player]
    }

    pub fn name(&self, player: Player) -> &str {
        &self.participants[player].name
    }

    pub fn set_phase(&mut self, phase: Phase) {
        trace!(from = ?self.phase, to = ?phase, "session phase");
        self.phase = phase;
    }

    /// Install the position after a move and who moves next
    pub fn advance(&mut self, board: Board, to_move: Option<Player>) {
        self.board = board;
        self.to_move = to_move;
    }

    /// Stop every participant. Only the first call does anything; returns
    /// whether this was it.
    pub fn clean_up(&mut self) -> bool {
        if self.cleaned_up {
            return false;
        }
        self.cleaned_up = true;

        for participant in self.participants.iter_mut() {
            debug!(participant = %participant.name, "stopping participant");
            participant.sandbox.stop();
        }
        self.set_phase(Phase::CleanedUp);
        true
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("board", &self.board)
            .field("to_move", &self.to_move)
            .field("phase", &self.phase)
            .field("black", &self.participants[Player::Black])
            .field("white", &self.participants[Player::White])
            .finish()
    }
}
