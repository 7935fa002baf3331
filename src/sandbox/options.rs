//! Timing and capture limits for strategy processes

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxOptions {
    /// Extra time granted on top of the move time limit before a query is
    /// declared timed out
    #[serde(rename = "slack_ms", with = "millis")]
    pub slack: Duration,
    /// How long a process gets to exit after `quit` before it is killed
    #[serde(rename = "grace_ms", with = "millis")]
    pub grace: Duration,
    /// How long a freshly spawned process gets to answer `readyok`
    #[serde(rename = "ready_timeout_ms", with = "millis")]
    pub ready_timeout: Duration,
    /// Window for trailing stderr output after a reply
    #[serde(rename = "diagnostic_settle_ms", with = "millis")]
    pub diagnostic_settle: Duration,
    /// Cap on diagnostic text kept per query
    pub max_diagnostic_bytes: usize,
}

impl SandboxOptions {
    pub fn with_slack(mut self, slack: Duration) -> Self {
        self.slack = slack;
        self
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn with_ready_timeout(mut self, ready_timeout: Duration) -> Self {
        self.ready_timeout = ready_timeout;
        self
    }
}

impl Default for SandboxOptions {
    fn default() -> Self {
        Self {
            slack: Duration::from_secs(1),
            grace: Duration::from_millis(500),
            ready_timeout: Duration::from_secs(5),
            diagnostic_settle: Duration::from_millis(20),
            max_diagnostic_bytes: 8 * 1024,
        }
    }
}

/// Serde adapter storing a `Duration` as whole milliseconds
pub(crate) mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
