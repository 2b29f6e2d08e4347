use crate::breakpoints::BreakpointMap;
use crate::errors::ChannelError;

/// Acknowledgement returned by the kernel's input channel (the message id of the
/// `input_reply`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InputAck(pub String);

impl InputAck {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The two logical channels to the debugger kernel, plus the out-of-band
/// breakpoint call. Every method returns without waiting on the kernel.
pub trait KernelChannel {
    /// Send one line on the stdin channel.
    fn send_input(&mut self, line: &str) -> Result<InputAck, ChannelError>;

    /// Deliver every output message already received on the iopub channel to
    /// its consumers. Returns once nothing older is pending.
    fn flush_output(&mut self) -> Result<(), ChannelError>;

    fn set_breakpoints(&mut self, breakpoints: &BreakpointMap) -> Result<(), ChannelError>;
}
