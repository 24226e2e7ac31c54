use thiserror::Error;

/// Fatal configuration problems, detected once at startup (spec §7).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown switching rule '{0}' (expected one of a-f)")]
    UnknownRule(char),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

/// Invariant violations and resource exhaustion surfaced by the running
/// simulation (spec §7). Every variant represents a logic defect; none of
/// these are recovered internally.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("event queue is empty while simulated time has not reached the bound")]
    EmptyEventQueue,

    #[error("rule {rule} invoked with an empty productive-dimension set")]
    EmptyProductiveSet { rule: char },

    #[error("port {port} at node {node} is already occupied")]
    PortOccupied { node: u64, port: usize },
}
