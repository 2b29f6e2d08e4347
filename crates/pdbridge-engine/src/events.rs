//! Broadcast channel for [`MediatorEvent`]s.

use std::sync::atomic::{AtomicU64, Ordering};

use pdbridge_core::events::MediatorEvent;
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 256;

/// Non-blocking fan-out of mediator events. Lagging receivers lose events
/// instead of stalling the console thread.
pub struct EventEmitter {
    tx: broadcast::Sender<MediatorEvent>,
    emit_count: AtomicU64,
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            emit_count: AtomicU64::new(0),
        }
    }

    /// Returns the number of receivers reached (0 with no subscribers).
    pub fn emit(&self, event: MediatorEvent) -> usize {
        let _ = self.emit_count.fetch_add(1, Ordering::Relaxed);
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MediatorEvent> {
        self.tx.subscribe()
    }

    pub fn emit_count(&self) -> u64 {
        self.emit_count.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_without_subscribers() {
        let emitter = EventEmitter::new();
        let sent = emitter.emit(MediatorEvent::DebugLoopChanged {
            active: true,
            discarded: 0,
        });
        assert_eq!(sent, 0);
        assert_eq!(emitter.emit_count(), 1);
    }

    #[test]
    fn subscriber_receives() {
        let emitter = EventEmitter::new();
        let mut rx = emitter.subscribe();
        let event = MediatorEvent::PdbStep {
            fname: "/w/app.py".into(),
            lineno: 3,
        };
        assert_eq!(emitter.emit(event.clone()), 1);
        assert_eq!(rx.try_recv().unwrap(), event);
    }
}
