//! Othello Arena - runs Othello games between humans and sandboxed strategies

pub mod bridge;
pub mod config;
pub mod core;
pub mod error;
pub mod event;
pub mod protocol;
pub mod registry;
pub mod runner;
pub mod sandbox;
pub mod strategy;

// Re-export commonly used items
pub use bridge::{EmissionBridge, Emitter};
pub use config::{ArenaConfig, ConfigError};
pub use core::{Board, Cell, Move, Player};
pub use error::{BridgeError, RunnerError, SandboxError};
pub use event::{Envelope, GameEvent};
pub use registry::{Participant, ParticipantKind, Resolver, StrategyRegistry, HUMAN};
pub use runner::{GameRunner, RunnerOptions, Termination};
pub use sandbox::{HumanSeat, LaunchSpec, MoveReply, ProcessSandbox, Sandbox, SandboxOptions, SandboxState};
