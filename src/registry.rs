//! Name → participant resolution

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::sandbox::{HumanSeat, LaunchSpec, ProcessSandbox, Sandbox, SandboxOptions};
use crate::strategy::BUILTIN;

/// Reserved participant name for a human player
pub const HUMAN: &str = "human";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantKind {
    Human,
    Automated,
}

/// One side of a game
pub struct Participant {
    pub name: String,
    pub kind: ParticipantKind,
    pub sandbox: Box<dyn Sandbox>,
}

impl Participant {
    pub fn human() -> Self {
        Self {
            name: HUMAN.to_string(),
            kind: ParticipantKind::Human,
            sandbox: Box::new(HumanSeat::new()),
        }
    }

    pub fn automated(name: impl Into<String>, sandbox: Box<dyn Sandbox>) -> Self {
        Self {
            name: name.into(),
            kind: ParticipantKind::Automated,
            sandbox,
        }
    }

    pub fn is_human(&self) -> bool {
        self.kind == ParticipantKind::Human
    }
}

impl fmt::Debug for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Participant")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("state", &self.sandbox.state())
            .finish()
    }
}

/// Source of participants for a session
pub trait Resolver: Send + Sync {
    /// A fresh, unstarted participant, or `None` if `name` is unknown
    fn resolve(&self, name: &str) -> Option<Participant>;
}

/// Launch specs for every automated participant this host knows about
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    strategies: BTreeMap<String, LaunchSpec>,
    options: SandboxOptions,
}

impl StrategyRegistry {
    pub fn new(options: SandboxOptions) -> Self {
        Self {
            strategies: BTreeMap::new(),
            options,
        }
    }

    /// Registry with the built-in strategies, hosted by `<host_exe> strategy <name>`
    pub fn builtin(host_exe: &Path, options: SandboxOptions) -> Self {
        let mut registry = Self::new(options);
        for name in BUILTIN {
            registry.insert(name, LaunchSpec::new(host_exe).with_args(["strategy", name]));
        }
        registry
    }

    /// Add or replace an entry
    pub fn insert(&mut self, name: impl Into<String>, launch: LaunchSpec) -> Option<LaunchSpec> {
        self.strategies.insert(name.into(), launch)
    }

    pub fn get(&self, name: &str) -> Option<&LaunchSpec> {
        self.strategies.get(name)
    }

    /// Every resolvable name, human sentinel included
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.strategies.keys().cloned().collect();
        names.push(HUMAN.to_string());
        names
    }
}

impl Resolver for StrategyRegistry {
    fn resolve(&self, name: &str) -> Option<Participant> {
        if name == HUMAN {
            return Some(Participant::human());
        }
        let launch = self.strategies.get(name)?;
        let sandbox = ProcessSandbox::new(name, launch.clone(), self.options.clone());
        Some(Participant::automated(name, Box::new(sandbox)))
    }
}
