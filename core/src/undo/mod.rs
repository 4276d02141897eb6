//! Undo/redo command framework.
//!
//! The structure engine only *builds* commands. This module is the default
//! executor a host can run them through:
//!
//! - [`Command`] / [`ValueCommand`]: reversible graph mutations
//! - [`CommandHistory`]: bounded undo/redo stack with save tracking
//! - [`CommandQueue`]: thread-safe submission queue for editor handles
//! - [`CommandManager`]: document root holder plus history plus listeners
//!
//! # Recorded vs non-recorded commands
//!
//! Commands are recorded in the history by default. Override
//! [`Command::is_recorded`] to return `false` for transient operations.
//! Recorded commands returning `false` from [`Command::modifies_content`]
//! are undoable but do not affect [`CommandHistory::has_unsaved_changes`].

mod command;
mod history;
mod manager;
mod queue;

pub use command::{AsAny, Command, CommandError, CommandResult, ValueCommand};
pub use history::{CommandHistory, DEFAULT_MAX_UNDO};
pub use manager::{CommandManager, ListenerId, TargetHolder};
pub use queue::CommandQueue;
