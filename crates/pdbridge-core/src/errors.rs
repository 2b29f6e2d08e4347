/// Failures reported by the kernel transport. The mediator surfaces these to its
/// caller and never retries; retry policy belongs to the transport.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("kernel channel closed")]
    Closed,
    #[error("kernel rejected input: {0}")]
    Rejected(String),
    #[error("transport error: {0}")]
    Transport(String),
}

impl ChannelError {
    /// Short classification string for logging/metrics.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Rejected(_) => "rejected",
            Self::Transport(_) => "transport",
        }
    }
}

/// Failures of the durable history log.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("history store unavailable: {0}")]
    Unavailable(String),
    #[error("history write failed: {0}")]
    Write(String),
    #[error("history read failed: {0}")]
    Read(String),
}
