//! Line protocol between the game runner and strategy processes

pub mod command;
pub mod host;

pub use command::{parse_command, Command, Reply};
pub use host::{serve, Flow, Host};
