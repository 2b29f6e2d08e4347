use std::collections::VecDeque;

use pdbridge_core::commands::QueuedCommand;

/// FIFO of commands waiting for the debugger to ask for input.
///
/// Every mutation goes through `enqueue`, `drain_one` or `clear_all`.
#[derive(Clone, Debug, Default)]
pub struct CommandQueue {
    entries: VecDeque<QueuedCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, command: QueuedCommand) {
        self.entries.push_back(command);
    }

    /// Take the oldest command, if any.
    pub fn drain_one(&mut self) -> Option<QueuedCommand> {
        self.entries.pop_front()
    }

    /// Discard everything. Returns how many commands were dropped.
    pub fn clear_all(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedCommand> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_order() {
        let mut queue = CommandQueue::new();
        queue.enqueue(QueuedCommand::new("next", false));
        queue.enqueue(QueuedCommand::new("step", true));

        assert_eq!(queue.drain_one(), Some(QueuedCommand::new("next", false)));
        assert_eq!(queue.drain_one(), Some(QueuedCommand::new("step", true)));
        assert_eq!(queue.drain_one(), None);
    }

    #[test]
    fn clear_reports_discarded() {
        let mut queue = CommandQueue::new();
        assert_eq!(queue.clear_all(), 0);
        queue.enqueue(QueuedCommand::new("a", false));
        queue.enqueue(QueuedCommand::new("b", false));
        assert_eq!(queue.clear_all(), 2);
        assert!(queue.is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn fifo_order_preserved(lines in proptest::collection::vec("[a-z]{1,6}", 0..32)) {
                let mut queue = CommandQueue::new();
                for line in &lines {
                    queue.enqueue(QueuedCommand::new(line.clone(), false));
                }
                prop_assert_eq!(queue.len(), lines.len());

                let mut drained = Vec::new();
                while let Some(cmd) = queue.drain_one() {
                    drained.push(cmd.line);
                }
                prop_assert_eq!(drained, lines);
            }
        }
    }
}
