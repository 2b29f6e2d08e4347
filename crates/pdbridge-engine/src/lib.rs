//! # pdbridge-engine
//!
//! Mediates between an interactive console and a line-oriented debugger
//! running in a separate kernel.
//!
//! - [`session`]: debug-loop flag, last prompt, input readiness and the command queue
//! - [`mediator`]: the dispatcher, input-request handler and readline callback
//! - [`history`]: command history recording and Up/Down recall
//!
//! All state lives on the console's control thread; nothing here blocks.

#![deny(unsafe_code)]

pub mod browse;
pub mod error;
pub mod events;
pub mod history;
pub mod magic;
pub mod mediator;
pub mod metric_names;
pub mod queue;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::MediatorError;
pub use mediator::{
    DebugMediator, HistoryKey, InputRequestOutcome, MediatorConfig, ReadlineOutcome,
    SubmitOutcome,
};
pub use session::{SessionPhase, SessionState};
