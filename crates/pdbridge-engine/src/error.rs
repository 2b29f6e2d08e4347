use pdbridge_core::errors::ChannelError;

/// Errors surfaced by the debug mediator.
#[derive(Debug, thiserror::Error)]
pub enum MediatorError {
    /// The request is not allowed in the console's current mode.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}

impl MediatorError {
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::InvalidState(_) => "invalid_state",
            Self::Channel(e) => e.error_kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_errors_convert() {
        let err: MediatorError = ChannelError::Closed.into();
        assert!(matches!(err, MediatorError::Channel(ChannelError::Closed)));
        assert_eq!(err.error_kind(), "closed");
        assert_eq!(err.to_string(), "kernel channel closed");
    }

    #[test]
    fn invalid_state_display() {
        let err = MediatorError::InvalidState("hidden execution".into());
        assert_eq!(err.to_string(), "invalid state: hidden execution");
        assert_eq!(err.error_kind(), "invalid_state");
    }
}
