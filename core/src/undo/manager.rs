//! Root holder plus history: the executor hosts hand commands to.

use std::fmt;
use std::sync::Arc;

use crate::shared::Shared;

use super::command::{Command, CommandResult};
use super::history::{CommandHistory, DEFAULT_MAX_UNDO};

/// Holds the root of the edited document.
///
/// The root lives in an optional slot so that commands can replace the
/// whole document the same way they replace any other property.
#[derive(Debug)]
pub struct TargetHolder<T> {
    pub target: Option<Shared<T>>,
}

/// Identifies a listener registered with [`CommandManager::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Executes commands against a document and notifies listeners.
///
/// Every successful [`execute`](Self::execute), [`undo`](Self::undo) or
/// [`redo`](Self::redo) fires the "target updated" listeners synchronously,
/// before the call returns. Listeners must not re-enter the manager.
pub struct CommandManager<T> {
    holder: Shared<TargetHolder<T>>,
    history: CommandHistory,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl<T: Send + Sync + 'static> CommandManager<T> {
    pub fn new(target: T) -> Self {
        Self::with_max_undo(target, DEFAULT_MAX_UNDO)
    }

    pub fn with_max_undo(target: T, max_undo: usize) -> Self {
        Self {
            holder: Shared::new(TargetHolder {
                target: Some(Shared::new(target)),
            }),
            history: CommandHistory::new(max_undo),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// The holder whose `target` slot is the document root.
    pub fn holder(&self) -> &Shared<TargetHolder<T>> {
        &self.holder
    }

    /// The current document root, if any.
    pub fn target(&self) -> Option<Shared<T>> {
        self.holder.read().target.clone()
    }

    /// Swaps in a new document. History is cleared.
    pub fn replace_target(&mut self, target: T) {
        self.holder.write().target = Some(Shared::new(target));
        self.history.clear();
        self.history.mark_saved();
        self.notify();
    }

    pub fn execute(&mut self, command: Box<dyn Command>) -> CommandResult {
        let description = command.description().to_owned();
        self.history.execute(command)?;
        log::debug!("executed: {description}");
        self.notify();
        Ok(())
    }

    pub fn undo(&mut self) -> CommandResult {
        self.history.undo()?;
        self.notify();
        Ok(())
    }

    pub fn redo(&mut self) -> CommandResult {
        self.history.redo()?;
        self.notify();
        Ok(())
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.history.has_unsaved_changes()
    }

    /// Registers a "target updated" listener.
    pub fn subscribe(&mut self, listener: impl Fn() + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener();
        }
    }
}

impl<T> fmt::Debug for CommandManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandManager")
            .field("history", &self.history)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Double {
        counter: Shared<i32>,
    }

    impl Command for Double {
        fn apply(&mut self) -> CommandResult {
            *self.counter.write() *= 2;
            Ok(())
        }

        fn undo(&mut self) -> CommandResult {
            *self.counter.write() /= 2;
            Ok(())
        }

        fn description(&self) -> &str {
            "Double"
        }
    }

    fn counting(manager: &mut CommandManager<i32>) -> (Arc<AtomicUsize>, ListenerId) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let id = manager.subscribe(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (count, id)
    }

    #[test]
    fn execute_undo_redo_notify() {
        let mut manager = CommandManager::new(3);
        let (count, _) = counting(&mut manager);
        let counter = manager.target().unwrap();

        manager.execute(Box::new(Double { counter: counter.clone() })).unwrap();
        assert_eq!(*counter.read(), 6);
        manager.undo().unwrap();
        assert_eq!(*counter.read(), 3);
        manager.redo().unwrap();
        assert_eq!(*counter.read(), 6);
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn failed_undo_does_not_notify() {
        let mut manager = CommandManager::new(0);
        let (count, _) = counting(&mut manager);
        assert!(manager.undo().is_err());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut manager = CommandManager::new(1);
        let (count, id) = counting(&mut manager);
        assert!(manager.unsubscribe(id));
        assert!(!manager.unsubscribe(id));
        manager.replace_target(2);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn replace_target_clears_history() {
        let mut manager = CommandManager::new(1);
        let counter = manager.target().unwrap();
        manager.execute(Box::new(Double { counter })).unwrap();
        assert!(manager.has_unsaved_changes());

        manager.replace_target(10);
        assert!(!manager.can_undo());
        assert!(!manager.has_unsaved_changes());
        assert_eq!(*manager.target().unwrap().read(), 10);
    }
}
