//! Reversible commands over a shared object graph.
//!
//! - [`Command`]: a reversible mutation (Command pattern)
//! - [`ValueCommand`]: a command that also reports the value it writes
//! - [`CommandError`] / [`CommandResult`]: error handling for commands
//!
//! Commands are self-contained: each implementation holds [`Shared`]
//! handles to the slots it touches, so neither `apply` nor `undo` takes a
//! target argument.
//!
//! [`Shared`]: crate::Shared

use std::any::Any;
use std::fmt;

use crate::shared::Target;

/// Helper trait for downcasting trait objects to concrete types.
///
/// Automatically implemented for all `'static` types. Used by
/// [`Command::merge`] to downcast `&dyn Command` to the concrete command
/// type for merging.
pub trait AsAny: 'static {
    fn as_any(&self) -> &dyn Any;
}

impl<T: 'static> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Error type for command execution failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The value the command refers to is no longer where it was.
    #[error("target not found: {0}")]
    TargetNotFound(String),
    /// The slot is in an invalid state for this command.
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
    /// A custom error with a description.
    #[error("{0}")]
    Custom(String),
}

/// Result type for command operations.
pub type CommandResult<T = ()> = Result<T, CommandError>;

/// A reversible mutation of the object graph.
///
/// # Merging
///
/// Commands representing incremental changes can override
/// [`merge`](Self::merge) so that consecutive commands coalesce into one
/// undo step. Use [`AsAny::as_any`] on `*other` (not the box) to
/// downcast it.
///
/// # Object Safety
///
/// This trait is dyn-compatible so different command types can share one
/// [`CommandHistory`](super::CommandHistory) as `Box<dyn Command>`.
pub trait Command: fmt::Debug + AsAny + Send {
    /// Applies the command (forward / redo direction).
    fn apply(&mut self) -> CommandResult;

    /// Reverses the command. Must restore the state from before
    /// [`apply`](Self::apply).
    fn undo(&mut self) -> CommandResult;

    /// A short, human-readable description for the edit menu.
    ///
    /// Examples: `"Add Contact"`, `"Remove Home Address"`.
    fn description(&self) -> &str;

    /// Tries to merge `other` into `self`, taking ownership.
    ///
    /// Returns `None` if `other` was absorbed, `Some(other)` otherwise.
    /// Does not merge by default.
    fn merge(&mut self, other: Box<dyn Command>) -> Option<Box<dyn Command>> {
        Some(other)
    }

    /// Whether this command is recorded in the undo/redo history.
    ///
    /// Default: `true`.
    fn is_recorded(&self) -> bool {
        true
    }

    /// Whether executing this command prevents the next recorded command
    /// from merging with the previous undo entry.
    ///
    /// Only meaningful for non-recorded commands.
    ///
    /// Default: `false`.
    fn breaks_merge(&self) -> bool {
        false
    }

    /// Whether this command changes document content.
    ///
    /// Recorded commands returning `false` (selection-like changes) are
    /// undoable but do not move the save point.
    ///
    /// Default: `true`.
    fn modifies_content(&self) -> bool {
        true
    }
}

/// A command that writes a value into the graph.
///
/// [`value`](Self::value) is the handle the command writes, available
/// before the command runs. Hosts use it to select the new value once the
/// tree is rebuilt.
pub trait ValueCommand: Command {
    /// The value written by [`apply`](Command::apply), or `None` if the
    /// command clears a slot.
    fn value(&self) -> Option<Target>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Shared;

    #[derive(Debug)]
    struct Add {
        counter: Shared<i32>,
        amount: i32,
    }

    impl Command for Add {
        fn apply(&mut self) -> CommandResult {
            *self.counter.write() += self.amount;
            Ok(())
        }

        fn undo(&mut self) -> CommandResult {
            *self.counter.write() -= self.amount;
            Ok(())
        }

        fn description(&self) -> &str {
            "Add"
        }
    }

    impl ValueCommand for Add {
        fn value(&self) -> Option<Target> {
            Some(self.counter.target())
        }
    }

    #[test]
    fn apply_and_undo() {
        let counter = Shared::new(0);
        let mut command = Add {
            counter: counter.clone(),
            amount: 5,
        };
        command.apply().unwrap();
        assert_eq!(*counter.read(), 5);
        command.undo().unwrap();
        assert_eq!(*counter.read(), 0);
    }

    #[test]
    fn defaults() {
        let command = Add {
            counter: Shared::new(0),
            amount: 1,
        };
        assert!(command.is_recorded());
        assert!(!command.breaks_merge());
        assert!(command.modifies_content());
        assert_eq!(command.description(), "Add");
    }

    #[test]
    fn value_command_upcasts_to_command() {
        let counter = Shared::new(0);
        let boxed: Box<dyn ValueCommand> = Box::new(Add {
            counter: counter.clone(),
            amount: 3,
        });
        assert_eq!(boxed.value(), Some(counter.target()));
        let mut command: Box<dyn Command> = boxed;
        command.apply().unwrap();
        assert_eq!(*counter.read(), 3);
    }

    #[test]
    fn error_display() {
        assert_eq!(
            CommandError::TargetNotFound("contact".into()).to_string(),
            "target not found: contact"
        );
        assert_eq!(
            CommandError::InvalidState("locked".into()).to_string(),
            "invalid state: locked"
        );
        assert_eq!(CommandError::NothingToUndo.to_string(), "nothing to undo");
        assert_eq!(
            CommandError::Custom("something went wrong".into()).to_string(),
            "something went wrong"
        );
    }
}
