//! Undo/redo command history.
//!
//! [`CommandHistory`] manages a linear undo/redo stack of [`Command`] trait
//! objects. Executing a new command after undoing clears the redo stack.

use std::collections::VecDeque;
use std::fmt;

use super::command::{Command, CommandError, CommandResult};

/// Default maximum number of undo steps.
pub const DEFAULT_MAX_UNDO: usize = 100;

/// Manages an undo/redo stack of commands.
///
/// The undo stack is bounded: when it exceeds `max_undo`, the oldest
/// command is dropped from the front.
pub struct CommandHistory {
    undo_stack: VecDeque<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
    max_undo: usize,
    merge_broken: bool,
    /// Distance from the saved state.
    ///
    /// - `Some(0)`: the current state matches the last save.
    /// - `Some(n)`, `n > 0`: `n` undos reach the saved state.
    /// - `Some(n)`, `n < 0`: `|n|` redos reach the saved state.
    /// - `None`: the save point is unreachable.
    save_distance: Option<i64>,
}

impl CommandHistory {
    /// Empty history keeping at most `max_undo` undo steps. The oldest
    /// step is dropped once the limit is reached.
    pub fn new(max_undo: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_undo,
            merge_broken: false,
            save_distance: Some(0),
        }
    }

    /// Applies a command and, if it is
    /// [recorded](Command::is_recorded), pushes it onto the undo stack.
    ///
    /// Recorded commands clear the redo stack and try to
    /// [merge](Command::merge) with the top of the undo stack. A command
    /// that fails to apply is not pushed.
    pub fn execute(&mut self, mut command: Box<dyn Command>) -> CommandResult {
        command.apply()?;

        if !command.is_recorded() {
            if command.breaks_merge() {
                self.merge_broken = true;
            }
            return Ok(());
        }

        let is_content = command.modifies_content();

        // A save point sitting in the redo branch is lost with it.
        self.redo_stack.clear();
        if is_content
            && let Some(d) = self.save_distance
            && d < 0
        {
            self.save_distance = None;
        }

        if !self.merge_broken
            && let Some(last) = self.undo_stack.back_mut()
        {
            match last.merge(command) {
                None => {
                    if is_content && self.save_distance == Some(0) {
                        self.save_distance = None;
                    }
                    return Ok(());
                }
                Some(returned) => command = returned,
            }
        }
        self.merge_broken = false;

        if is_content && let Some(d) = &mut self.save_distance {
            *d += 1;
        }

        self.undo_stack.push_back(command);
        self.trim();
        Ok(())
    }

    /// Undoes the most recent command.
    pub fn undo(&mut self) -> CommandResult {
        let mut command = self
            .undo_stack
            .pop_back()
            .ok_or(CommandError::NothingToUndo)?;
        if let Err(e) = command.undo() {
            self.undo_stack.push_back(command);
            return Err(e);
        }
        let is_content = command.modifies_content();
        self.redo_stack.push(command);
        if is_content && let Some(d) = &mut self.save_distance {
            *d -= 1;
        }
        Ok(())
    }

    /// Redoes the most recently undone command.
    pub fn redo(&mut self) -> CommandResult {
        let mut command = self.redo_stack.pop().ok_or(CommandError::NothingToRedo)?;
        if let Err(e) = command.apply() {
            self.redo_stack.push(command);
            return Err(e);
        }
        let is_content = command.modifies_content();
        self.undo_stack.push_back(command);
        if is_content && let Some(d) = &mut self.save_distance {
            *d += 1;
        }
        self.trim();
        Ok(())
    }

    fn trim(&mut self) {
        if self.undo_stack.len() > self.max_undo {
            self.undo_stack.pop_front();
            if let Some(d) = self.save_distance
                && d > self.undo_stack.len() as i64
            {
                self.save_distance = None;
            }
        }
    }

    /// Returns `true` if there is a step to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns `true` if there is an undone step to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Undo descriptions, most recent first.
    pub fn undo_descriptions(&self) -> impl Iterator<Item = &str> {
        self.undo_stack.iter().rev().map(|c| c.description())
    }

    /// Redo descriptions, most recent first.
    pub fn redo_descriptions(&self) -> impl Iterator<Item = &str> {
        self.redo_stack.iter().rev().map(|c| c.description())
    }

    /// Number of steps on the undo stack. Merged commands count once.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of steps on the redo stack.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_undo(&self) -> usize {
        self.max_undo
    }

    /// Records the current state as the saved state.
    pub fn mark_saved(&mut self) {
        self.save_distance = Some(0);
    }

    /// Returns `true` if the current state differs from the last saved
    /// state, or if the save point is unreachable.
    pub fn has_unsaved_changes(&self) -> bool {
        self.save_distance != Some(0)
    }

    /// Clears both stacks. A current save point survives; any other is
    /// lost.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.merge_broken = false;
        if self.save_distance != Some(0) {
            self.save_distance = None;
        }
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO)
    }
}

impl fmt::Debug for CommandHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHistory")
            .field("undo_count", &self.undo_stack.len())
            .field("redo_count", &self.redo_stack.len())
            .field("max_undo", &self.max_undo)
            .field("merge_broken", &self.merge_broken)
            .field("save_distance", &self.save_distance)
            .finish()
    }
}
