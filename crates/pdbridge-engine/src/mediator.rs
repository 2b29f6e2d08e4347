//! The debug mediator.
//!
//! Sits between a console and a debugger kernel. Commands reach the kernel
//! through [`DebugMediator::submit`]; the kernel asks for lines through
//! [`DebugMediator::handle_input_request`]; completed console reads come back
//! through [`DebugMediator::on_readline`]. Commands that arrive while the
//! debugger is busy wait in the session queue and are drained one per input
//! request.

use std::sync::Arc;

use pdbridge_core::breakpoints::{breakpoint_count, BreakpointMap};
use pdbridge_core::commands::QueuedCommand;
use pdbridge_core::console::ConsoleSurface;
use pdbridge_core::events::{InputRequest, MediatorEvent};
use pdbridge_core::history::HistoryLog;
use pdbridge_core::kernel::{InputAck, KernelChannel};
use pdbridge_core::prompt::DEBUGGER_PROMPT;
use pdbridge_settings::PdbridgeSettings;
use pdbridge_telemetry::MetricsRecorder;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::error::MediatorError;
use crate::events::EventEmitter;
use crate::history::PdbHistory;
use crate::magic::{line_magic_command, rewrite_plot_magic};
use crate::metric_names::{
    COMMANDS_DELIVERED, COMMANDS_FAILED, COMMANDS_QUEUED, PROMPT_REDISPLAY_SUPPRESSED,
    QUEUE_DEPTH, READLINE_DROPPED,
};
use crate::session::SessionState;

/// Tunables taken from the `debugger` and `history` settings sections.
#[derive(Clone, Debug)]
pub struct MediatorConfig {
    pub prompt_marker: String,
    pub plot_magic_prefix: String,
    pub history_max: usize,
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self {
            prompt_marker: DEBUGGER_PROMPT.to_string(),
            plot_magic_prefix: "%plot ".to_string(),
            history_max: 400,
        }
    }
}

impl From<&PdbridgeSettings> for MediatorConfig {
    fn from(settings: &PdbridgeSettings) -> Self {
        Self {
            prompt_marker: settings.debugger.prompt.clone(),
            plot_magic_prefix: settings.debugger.plot_magic_prefix.clone(),
            history_max: settings.history.max_entries,
        }
    }
}

/// What happened to a submitted command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Sent to the kernel's input channel.
    Delivered(InputAck),
    /// Held until the debugger asks for input.
    Queued,
    /// No debug loop to deliver to.
    Ignored,
}

/// Result of processing a kernel input request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputRequestOutcome {
    /// Whether a new prompt was shown.
    pub redisplayed: bool,
    /// Outcome of the queued command drained by this request, if any.
    pub drained: Option<SubmitOutcome>,
}

/// Result of a completed console read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadlineOutcome {
    /// A plain (non-debugger) input read, passed straight to the kernel.
    Forwarded(InputAck),
    /// A debugger command, handed to the dispatcher.
    Dispatched(SubmitOutcome),
    /// No read was outstanding; the line was discarded.
    Dropped,
}

/// Keys the console routes to the mediator while it is reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryKey {
    Up,
    Down,
    Enter,
    Other,
}

pub struct DebugMediator<C, K> {
    console: C,
    kernel: K,
    session: SessionState,
    history: PdbHistory,
    config: MediatorConfig,
    metrics: Arc<MetricsRecorder>,
    events: EventEmitter,
}

impl<C: ConsoleSurface, K: KernelChannel> DebugMediator<C, K> {
    pub fn new(
        console: C,
        kernel: K,
        log: Arc<dyn HistoryLog>,
        metrics: Arc<MetricsRecorder>,
        config: MediatorConfig,
    ) -> Self {
        let history = PdbHistory::load(log, config.history_max, Arc::clone(&metrics));
        Self {
            console,
            kernel,
            session: SessionState::new(config.prompt_marker.clone()),
            history,
            config,
            metrics,
            events: EventEmitter::new(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MediatorEvent> {
        self.events.subscribe()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn history(&self) -> &PdbHistory {
        &self.history
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn kernel_mut(&mut self) -> &mut K {
        &mut self.kernel
    }

    /// Debugging started or stopped in the kernel.
    pub fn set_debug_loop(&mut self, active: bool) {
        let discarded = self.session.enter_or_exit_debug_loop(active);
        self.report_queue_depth();
        if discarded > 0 {
            info!(active, discarded, "debug loop changed, dropped queued commands");
        } else {
            debug!(active, "debug loop changed");
        }
        let _ = self
            .events
            .emit(MediatorEvent::DebugLoopChanged { active, discarded });
    }

    /// Send a command to the debugger, or queue it until the debugger asks.
    ///
    /// An empty line repeats the last command. Hidden commands are not echoed.
    pub fn submit(&mut self, line: &str, hidden: bool) -> Result<SubmitOutcome, MediatorError> {
        let line = if line.trim().is_empty() {
            self.session.last_command().to_string()
        } else {
            line.to_string()
        };

        if !self.session.is_waiting_for_input() {
            if !self.session.is_in_debug_loop() {
                debug!(line = %line, "not debugging, command ignored");
                return Ok(SubmitOutcome::Ignored);
            }
            self.enqueue(line, hidden);
            return Ok(SubmitOutcome::Queued);
        }

        if !self.session.input_ready() {
            self.enqueue(line, hidden);
            return Ok(SubmitOutcome::Queued);
        }

        if !hidden {
            self.console.append_echo(&format!("{line}\n"));
            self.console.set_reading(false);
            let end = self.console.end_position();
            self.console.anchor_before_prompt(end);
        }
        self.session.set_input_ready(false);
        let ack = self.send(&line)?;
        self.metrics.counter_inc(COMMANDS_DELIVERED, &[], 1);
        Ok(SubmitOutcome::Delivered(ack))
    }

    /// The kernel asked for a line.
    ///
    /// Pending output is flushed first so the prompt lands after it. At most
    /// one queued command is sent per request.
    #[instrument(skip_all, fields(prompt = %request.content.prompt, password = request.content.password))]
    pub fn handle_input_request(
        &mut self,
        request: &InputRequest,
    ) -> Result<InputRequestOutcome, MediatorError> {
        if self.console.is_hidden() {
            return Err(MediatorError::InvalidState(
                "input requested during hidden execution".into(),
            ));
        }

        self.kernel.flush_output()?;
        self.session.set_input_ready(true);
        self.session.set_executing(false);

        let prompt = request.signature();
        let previous = self.session.replace_prompt(prompt.clone());
        // A prompt identical to the one being read comes from an injected
        // command; showing it again would duplicate it on screen.
        let redisplayed = !self.console.is_reading() || previous.as_ref() != Some(&prompt);
        if redisplayed {
            self.console.set_highlighting(true);
            self.console.set_reading(false);
            self.console.begin_read(&prompt);
        } else {
            debug!("same prompt while reading, not redisplayed");
            self.metrics.counter_inc(PROMPT_REDISPLAY_SUPPRESSED, &[], 1);
        }

        let mut drained = None;
        if self.session.is_waiting_for_input() {
            if let Some(next) = self.session.drain_one() {
                self.report_queue_depth();
                debug!(line = %next.line, remaining = self.session.queue().len(), "draining queued command");
                drained = Some(self.submit(&next.line, next.hidden)?);
            }
        }

        Ok(InputRequestOutcome {
            redisplayed,
            drained,
        })
    }

    /// The console finished reading `line`.
    pub fn on_readline(&mut self, line: &str) -> Result<ReadlineOutcome, MediatorError> {
        if !self.session.is_waiting_for_input() {
            if !self.session.input_ready() {
                warn!(line, "console line with no outstanding read, dropped");
                self.metrics.counter_inc(READLINE_DROPPED, &[], 1);
                return Ok(ReadlineOutcome::Dropped);
            }
            self.session.set_input_ready(false);
            self.console.set_reading(false);
            let end = self.console.end_position();
            self.console.anchor_before_prompt(end);
            let ack = self.send(line)?;
            return Ok(ReadlineOutcome::Forwarded(ack));
        }

        let line = line.trim();
        let line_number = self.session.next_line_number();
        let _ = self.history.record(line_number, line);
        if !line.is_empty() {
            self.session.remember_command(line);
        }
        self.session.set_executing(true);

        let line = rewrite_plot_magic(line, &self.config.plot_magic_prefix)
            .unwrap_or_else(|| line.to_string());
        let outcome = self.submit(&line, true);
        self.console.set_highlighting(false);

        Ok(ReadlineOutcome::Dispatched(outcome?))
    }

    /// Route a history key while the console is reading. Returns true when
    /// the key was consumed.
    pub fn on_history_key(&mut self, key: HistoryKey) -> bool {
        if !self.console.is_reading() {
            return false;
        }
        match key {
            HistoryKey::Up | HistoryKey::Down => {
                let start = self.console.prompt_position();
                let typed = self.console.text_from(start);
                if let Some(text) = self.history.browse(&typed, key == HistoryKey::Up) {
                    self.console.replace_from(start, &text);
                }
                true
            }
            HistoryKey::Enter => {
                self.history.reset_browse();
                false
            }
            HistoryKey::Other => {
                self.history.end_whole_line();
                false
            }
        }
    }

    /// Run an IPython line magic from inside the debugger.
    pub fn exec_magic(&mut self, name: &str, args: &str) -> Result<SubmitOutcome, MediatorError> {
        if !self.session.is_waiting_for_input() {
            return Ok(SubmitOutcome::Ignored);
        }
        self.submit(&line_magic_command(name, args), true)
    }

    pub fn pdb_continue(&mut self) -> Result<SubmitOutcome, MediatorError> {
        self.submit("continue", false)
    }

    /// Push breakpoints to the kernel when a debugging session is set up.
    pub fn push_breakpoints(&mut self, breakpoints: &BreakpointMap) -> Result<(), MediatorError> {
        self.kernel.set_breakpoints(breakpoints)?;
        info!(
            files = breakpoints.len(),
            breakpoints = breakpoint_count(breakpoints),
            "breakpoints pushed"
        );
        Ok(())
    }

    /// Publish the state the debugger reports after each command. Anything
    /// other than a JSON object is ignored.
    pub fn set_pdb_state(&mut self, state: &Value) {
        let Some(state) = state.as_object() else {
            debug!("pdb state is not an object, ignored");
            return;
        };

        if let Some(step) = state.get("step").and_then(Value::as_object) {
            if let Some(fname) = step.get("fname").and_then(Value::as_str) {
                match step.get("lineno").and_then(Value::as_u64) {
                    Some(lineno) => {
                        let _ = self.events.emit(MediatorEvent::PdbStep {
                            fname: fname.to_string(),
                            lineno,
                        });
                    }
                    None => warn!(fname, "pdb step without a line number"),
                }
            }
        }
        if let Some(view) = state.get("namespace_view") {
            let _ = self
                .events
                .emit(MediatorEvent::NamespaceView { view: view.clone() });
        }
        if let Some(properties) = state.get("var_properties") {
            let _ = self.events.emit(MediatorEvent::VarProperties {
                properties: properties.clone(),
            });
        }
    }

    fn enqueue(&mut self, line: String, hidden: bool) {
        debug!(line = %line, hidden, "debugger busy, command queued");
        self.session.enqueue(QueuedCommand::new(line, hidden));
        self.metrics.counter_inc(COMMANDS_QUEUED, &[], 1);
        self.report_queue_depth();
    }

    fn send(&mut self, line: &str) -> Result<InputAck, MediatorError> {
        self.kernel.send_input(line).map_err(|e| {
            warn!(error = %e, kind = e.error_kind(), "kernel input failed");
            self.metrics
                .counter_inc(COMMANDS_FAILED, &[("kind", e.error_kind())], 1);
            MediatorError::from(e)
        })
    }

    fn report_queue_depth(&self) {
        self.metrics
            .gauge_set(QUEUE_DEPTH, &[], self.session.queue().len() as f64);
    }
}
