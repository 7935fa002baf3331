//! Error types shared across the game runner.
//!
//! Configuration errors live in [`crate::config::ConfigError`]; protocol
//! parsing uses `anyhow` like the rest of the text-level code.

use thiserror::Error;

/// Failure to bring a strategy process up.
///
/// Once a sandbox is running, query failures are reported as diagnostics on
/// the returned move rather than as errors.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// The process could not be spawned or never answered `readyok`.
    #[error("failed to start strategy '{name}': {reason}")]
    Startup { name: String, reason: String },

    /// `start()` was called on a handle that has already been started.
    #[error("strategy '{0}' was already started")]
    AlreadyStarted(String),
}

impl SandboxError {
    pub fn startup(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Startup {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

/// The network-facing side stopped listening for events.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    #[error("event bridge closed, dropping events for session {0}")]
    Closed(String),
}

/// Internal failures that end a session through the abnormal cleanup path.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("game runner panicked: {0}")]
    Panicked(String),
}
