//! Thread-safe queue for commands submitted by editor handles.
//!
//! Editor handles only hold an `Arc<CommandQueue>`, never the history.
//! The host drains the queue when idle and executes the commands through
//! its [`CommandManager`](super::CommandManager).

use std::fmt;

use parking_lot::Mutex;

use super::command::Command;

/// A thread-safe queue of pending [`Command`]s.
///
/// [`push()`](Self::push) only requires `&self`.
#[derive(Default)]
pub struct CommandQueue {
    queue: Mutex<Vec<Box<dyn Command>>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: Box<dyn Command>) {
        log::trace!("queued command: {}", command.description());
        self.queue.lock().push(command);
    }

    /// Drains all queued commands in submission order.
    pub fn drain(&self) -> Vec<Box<dyn Command>> {
        std::mem::take(&mut *self.queue.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }
}

impl fmt::Debug for CommandQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandQueue")
            .field("pending", &self.len())
            .finish()
    }
}
