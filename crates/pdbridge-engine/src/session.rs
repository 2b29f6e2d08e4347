//! Debug session state.
//!
//! The phase of a session is never stored. It is derived from whether the
//! debug loop is active, the last prompt the kernel showed, and whether an
//! input request is outstanding.

use pdbridge_core::commands::QueuedCommand;
use pdbridge_core::prompt::PromptSignature;

use crate::queue::CommandQueue;

/// Coarse view of where the session is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// No debugger attached.
    Idle,
    /// The debugger showed its prompt and waits for a command.
    WaitingForInput,
    /// A command was handed to the debugger and has not finished.
    Executing,
}

#[derive(Debug)]
pub struct SessionState {
    marker: String,
    debug_loop: bool,
    previous_prompt: Option<PromptSignature>,
    input_ready: bool,
    executing: bool,
    line_number: u64,
    queue: CommandQueue,
    last_command: String,
}

impl SessionState {
    /// `marker` is the prompt text meaning "the debugger wants a command".
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            debug_loop: false,
            previous_prompt: None,
            input_ready: false,
            executing: false,
            line_number: 0,
            queue: CommandQueue::new(),
            last_command: String::new(),
        }
    }

    /// Record that debugging started or stopped. Queued commands belong to the
    /// old context and are dropped; the line counter restarts.
    ///
    /// Returns the number of discarded commands.
    pub fn enter_or_exit_debug_loop(&mut self, active: bool) -> usize {
        self.debug_loop = active;
        self.line_number = 0;
        self.queue.clear_all()
    }

    pub fn is_in_debug_loop(&self) -> bool {
        self.debug_loop
    }

    pub fn is_waiting_for_input(&self) -> bool {
        self.debug_loop
            && self
                .previous_prompt
                .as_ref()
                .is_some_and(|p| p.matches(&self.marker))
    }

    /// Classify a prompt before it is committed to the session.
    pub fn is_debugger_input_request(&self, prompt_text: &str) -> bool {
        self.debug_loop && prompt_text == self.marker
    }

    pub fn phase(&self) -> SessionPhase {
        if !self.debug_loop {
            SessionPhase::Idle
        } else if self.executing || !self.is_waiting_for_input() {
            SessionPhase::Executing
        } else {
            SessionPhase::WaitingForInput
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn previous_prompt(&self) -> Option<&PromptSignature> {
        self.previous_prompt.as_ref()
    }

    /// Store `prompt` as the latest one and hand back the one it replaced.
    pub fn replace_prompt(&mut self, prompt: PromptSignature) -> Option<PromptSignature> {
        self.previous_prompt.replace(prompt)
    }

    pub fn input_ready(&self) -> bool {
        self.input_ready
    }

    pub fn set_input_ready(&mut self, ready: bool) {
        self.input_ready = ready;
    }

    pub fn is_executing(&self) -> bool {
        self.executing
    }

    pub fn set_executing(&mut self, executing: bool) {
        self.executing = executing;
    }

    /// Advance the per-loop line counter and return the new value.
    pub fn next_line_number(&mut self) -> u64 {
        self.line_number += 1;
        self.line_number
    }

    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    pub fn last_command(&self) -> &str {
        &self.last_command
    }

    pub fn remember_command(&mut self, line: &str) {
        self.last_command = line.to_string();
    }

    pub fn enqueue(&mut self, command: QueuedCommand) {
        self.queue.enqueue(command);
    }

    pub fn drain_one(&mut self) -> Option<QueuedCommand> {
        self.queue.drain_one()
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdbridge_core::prompt::DEBUGGER_PROMPT;

    fn waiting_session() -> SessionState {
        let mut session = SessionState::new(DEBUGGER_PROMPT);
        let _ = session.enter_or_exit_debug_loop(true);
        let _ = session.replace_prompt(PromptSignature::new(DEBUGGER_PROMPT, false));
        session
    }

    #[test]
    fn starts_idle() {
        let session = SessionState::new(DEBUGGER_PROMPT);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(!session.is_in_debug_loop());
        assert!(!session.is_waiting_for_input());
        assert!(!session.input_ready());
    }

    #[test]
    fn waiting_needs_loop_and_marker() {
        let mut session = SessionState::new(DEBUGGER_PROMPT);
        let _ = session.replace_prompt(PromptSignature::new(DEBUGGER_PROMPT, false));
        assert!(!session.is_waiting_for_input());

        let _ = session.enter_or_exit_debug_loop(true);
        assert!(session.is_waiting_for_input());
        assert_eq!(session.phase(), SessionPhase::WaitingForInput);

        let _ = session.replace_prompt(PromptSignature::new("Name? ", false));
        assert!(!session.is_waiting_for_input());
        assert_eq!(session.phase(), SessionPhase::Executing);
    }

    #[test]
    fn executing_flag_wins() {
        let mut session = waiting_session();
        session.set_executing(true);
        assert_eq!(session.phase(), SessionPhase::Executing);
    }

    #[test]
    fn classifies_requests() {
        let mut session = SessionState::new(DEBUGGER_PROMPT);
        assert!(!session.is_debugger_input_request("ipdb> "));
        let _ = session.enter_or_exit_debug_loop(true);
        assert!(session.is_debugger_input_request("ipdb> "));
        assert!(!session.is_debugger_input_request("(Pdb) "));
    }

    #[test]
    fn toggling_clears_queue_and_counter() {
        let mut session = waiting_session();
        session.enqueue(QueuedCommand::new("next", false));
        session.enqueue(QueuedCommand::new("step", false));
        let _ = session.next_line_number();
        let _ = session.next_line_number();

        assert_eq!(session.enter_or_exit_debug_loop(false), 2);
        assert!(session.queue().is_empty());
        assert_eq!(session.line_number(), 0);
        assert_eq!(session.phase(), SessionPhase::Idle);

        // Idempotent.
        assert_eq!(session.enter_or_exit_debug_loop(false), 0);
    }

    #[test]
    fn replace_prompt_returns_old() {
        let mut session = SessionState::new(DEBUGGER_PROMPT);
        assert!(session.replace_prompt(PromptSignature::new("a", false)).is_none());
        let old = session.replace_prompt(PromptSignature::new("b", true));
        assert_eq!(old, Some(PromptSignature::new("a", false)));
        assert_eq!(session.previous_prompt(), Some(&PromptSignature::new("b", true)));
    }
}
