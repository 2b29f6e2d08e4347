//! Fakes for driving the mediator in tests.

use std::sync::Arc;

use parking_lot::Mutex;
use pdbridge_core::breakpoints::BreakpointMap;
use pdbridge_core::console::ConsoleSurface;
use pdbridge_core::errors::{ChannelError, HistoryError};
use pdbridge_core::history::{HistoryLog, HistoryRecord};
use pdbridge_core::kernel::{InputAck, KernelChannel};
use pdbridge_core::prompt::PromptSignature;

/// Ordered record of calls made on the fake console and kernel.
pub type Trace = Arc<Mutex<Vec<String>>>;

pub fn new_trace() -> Trace {
    Arc::new(Mutex::new(Vec::new()))
}

#[derive(Debug)]
pub struct FakeConsole {
    pub transcript: String,
    pub reading: bool,
    pub hidden: bool,
    pub highlighting: bool,
    pub prompt_pos: usize,
    pub anchor: usize,
    pub reads: Vec<PromptSignature>,
    trace: Trace,
}

impl FakeConsole {
    pub fn new(trace: Trace) -> Self {
        Self {
            transcript: String::new(),
            reading: false,
            hidden: false,
            highlighting: false,
            prompt_pos: 0,
            anchor: 0,
            reads: Vec::new(),
            trace,
        }
    }

    /// Simulate keystrokes at the end of the input line.
    pub fn type_text(&mut self, text: &str) {
        self.transcript.push_str(text);
    }

    pub fn input_line(&self) -> String {
        self.text_from(self.prompt_pos)
    }
}

impl ConsoleSurface for FakeConsole {
    fn append_echo(&mut self, text: &str) {
        self.trace.lock().push(format!("echo:{}", text.trim_end()));
        self.transcript.push_str(text);
    }

    fn is_reading(&self) -> bool {
        self.reading
    }

    fn set_reading(&mut self, reading: bool) {
        self.reading = reading;
    }

    fn prompt_position(&self) -> usize {
        self.prompt_pos
    }

    fn end_position(&self) -> usize {
        self.transcript.len()
    }

    fn anchor_before_prompt(&mut self, position: usize) {
        self.anchor = position;
    }

    fn set_highlighting(&mut self, on: bool) {
        self.highlighting = on;
    }

    fn text_from(&self, position: usize) -> String {
        self.transcript.get(position..).unwrap_or_default().to_string()
    }

    fn replace_from(&mut self, position: usize, text: &str) {
        self.transcript.truncate(position);
        self.transcript.push_str(text);
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn begin_read(&mut self, prompt: &PromptSignature) {
        self.trace.lock().push(format!("read:{}", prompt.text));
        self.transcript.push_str(&prompt.text);
        self.prompt_pos = self.transcript.len();
        self.reading = true;
        self.reads.push(prompt.clone());
    }
}

#[derive(Debug)]
pub struct FakeKernel {
    pub sent: Vec<String>,
    pub flushes: usize,
    pub breakpoints: Vec<BreakpointMap>,
    /// Returned (once) by the next `send_input`.
    pub fail_next: Option<ChannelError>,
    trace: Trace,
}

impl FakeKernel {
    pub fn new(trace: Trace) -> Self {
        Self {
            sent: Vec::new(),
            flushes: 0,
            breakpoints: Vec::new(),
            fail_next: None,
            trace,
        }
    }
}

impl KernelChannel for FakeKernel {
    fn send_input(&mut self, line: &str) -> Result<InputAck, ChannelError> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        self.trace.lock().push(format!("input:{line}"));
        self.sent.push(line.to_string());
        Ok(InputAck(format!("reply-{}", self.sent.len())))
    }

    fn flush_output(&mut self) -> Result<(), ChannelError> {
        self.trace.lock().push("flush".to_string());
        self.flushes += 1;
        Ok(())
    }

    fn set_breakpoints(&mut self, breakpoints: &BreakpointMap) -> Result<(), ChannelError> {
        self.breakpoints.push(breakpoints.clone());
        Ok(())
    }
}

/// History log whose every call fails.
#[derive(Debug, Default)]
pub struct FailingHistoryLog;

impl HistoryLog for FailingHistoryLog {
    fn append(&self, _line_number: u64, _text: &str) -> Result<(), HistoryError> {
        Err(HistoryError::Unavailable("disk gone".into()))
    }

    fn read_tail(&self, _max: usize, _latest: bool) -> Result<Vec<HistoryRecord>, HistoryError> {
        Err(HistoryError::Unavailable("disk gone".into()))
    }
}
