//! Commands built by nodes and candidates.
//!
//! The engine constructs these but never runs them; hosts pass them to a
//! [`CommandManager`](structedit_core::undo::CommandManager). Each command
//! captures the pointer it writes through, so it stays valid after the
//! tree it came from has been rebuilt.

use std::fmt;

use structedit_core::undo::{Command, CommandError, CommandResult, ValueCommand};
use structedit_core::{Shared, Target};

use crate::element::ElementOf;
use crate::pointer::{ListPointer, ValuePointer};

/// Sets an optional slot to a new value or clears it.
pub struct SetValue<P> {
    pointer: ValuePointer<Option<Shared<P>>>,
    value: Option<Shared<P>>,
    previous: Option<Option<Shared<P>>>,
    description: String,
}

impl<P: Send + Sync + 'static> SetValue<P> {
    pub fn new(
        pointer: ValuePointer<Option<Shared<P>>>,
        value: Option<Shared<P>>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            pointer,
            value,
            previous: None,
            description: description.into(),
        }
    }
}

impl<P: Send + Sync + 'static> Command for SetValue<P> {
    fn apply(&mut self) -> CommandResult {
        self.previous = Some(self.pointer.get());
        self.pointer.set(self.value.clone());
        Ok(())
    }

    fn undo(&mut self) -> CommandResult {
        let previous = self
            .previous
            .take()
            .ok_or_else(|| CommandError::InvalidState(format!("{} was not applied", self.description)))?;
        self.pointer.set(previous);
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl<P: Send + Sync + 'static> ValueCommand for SetValue<P> {
    fn value(&self) -> Option<Target> {
        self.value.as_ref().map(Shared::target)
    }
}

impl<P> fmt::Debug for SetValue<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetValue")
            .field("description", &self.description)
            .field("clears", &self.value.is_none())
            .finish_non_exhaustive()
    }
}

fn position_of<L, E: ElementOf<L>>(items: &[L], element: &Shared<E>) -> Option<usize> {
    items.iter().position(|item| E::holds(item, element))
}

fn not_found<E>(description: &str) -> CommandError {
    CommandError::TargetNotFound(format!(
        "{description}: {} is no longer in the list",
        std::any::type_name::<E>()
    ))
}

/// Appends an element to a list.
pub struct AddToList<C: ?Sized, L, E> {
    list: ListPointer<C, L>,
    element: Shared<E>,
    description: String,
}

impl<C, L, E> AddToList<C, L, E>
where
    C: ?Sized + Send + Sync + 'static,
    L: Clone + Send + Sync + 'static,
    E: ElementOf<L>,
{
    pub fn new(list: ListPointer<C, L>, element: Shared<E>, description: impl Into<String>) -> Self {
        Self {
            list,
            element,
            description: description.into(),
        }
    }
}

impl<C, L, E> Command for AddToList<C, L, E>
where
    C: ?Sized + Send + Sync + 'static,
    L: Clone + Send + Sync + 'static,
    E: ElementOf<L>,
{
    fn apply(&mut self) -> CommandResult {
        let item = E::wrap(self.element.clone());
        self.list.with(|items| items.push(item));
        Ok(())
    }

    fn undo(&mut self) -> CommandResult {
        self.list.with(|items| -> CommandResult {
            let index =
                position_of(items, &self.element).ok_or_else(|| not_found::<E>(&self.description))?;
            items.remove(index);
            Ok(())
        })
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl<C, L, E> ValueCommand for AddToList<C, L, E>
where
    C: ?Sized + Send + Sync + 'static,
    L: Clone + Send + Sync + 'static,
    E: ElementOf<L>,
{
    fn value(&self) -> Option<Target> {
        Some(self.element.target())
    }
}

impl<C: ?Sized, L, E> fmt::Debug for AddToList<C, L, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddToList")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Removes a specific element from a list, located by identity.
///
/// The position is remembered so that undo puts the element back where
/// it was.
pub struct RemoveFromList<C: ?Sized, L, E> {
    list: ListPointer<C, L>,
    element: Shared<E>,
    index: Option<usize>,
    description: String,
}

impl<C, L, E> RemoveFromList<C, L, E>
where
    C: ?Sized + Send + Sync + 'static,
    L: Clone + Send + Sync + 'static,
    E: ElementOf<L>,
{
    pub fn new(list: ListPointer<C, L>, element: Shared<E>, description: impl Into<String>) -> Self {
        Self {
            list,
            element,
            index: None,
            description: description.into(),
        }
    }
}

impl<C, L, E> Command for RemoveFromList<C, L, E>
where
    C: ?Sized + Send + Sync + 'static,
    L: Clone + Send + Sync + 'static,
    E: ElementOf<L>,
{
    fn apply(&mut self) -> CommandResult {
        let index = self.list.with(|items| {
            let index = position_of(items, &self.element)?;
            items.remove(index);
            Some(index)
        });
        self.index = Some(index.ok_or_else(|| not_found::<E>(&self.description))?);
        Ok(())
    }

    fn undo(&mut self) -> CommandResult {
        let index = self.index.take().ok_or_else(|| {
            CommandError::InvalidState(format!("{} was not applied", self.description))
        })?;
        let item = E::wrap(self.element.clone());
        self.list.with(|items| {
            let index = index.min(items.len());
            items.insert(index, item);
        });
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl<C, L, E> ValueCommand for RemoveFromList<C, L, E>
where
    C: ?Sized + Send + Sync + 'static,
    L: Clone + Send + Sync + 'static,
    E: ElementOf<L>,
{
    fn value(&self) -> Option<Target> {
        None
    }
}

impl<C: ?Sized, L, E> fmt::Debug for RemoveFromList<C, L, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoveFromList")
            .field("description", &self.description)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// Replaces one element of a list with another at the same position.
pub struct ReplaceInList<C: ?Sized, L, E> {
    list: ListPointer<C, L>,
    old: Shared<E>,
    new: Shared<E>,
    description: String,
}

impl<C, L, E> ReplaceInList<C, L, E>
where
    C: ?Sized + Send + Sync + 'static,
    L: Clone + Send + Sync + 'static,
    E: ElementOf<L>,
{
    pub fn new(
        list: ListPointer<C, L>,
        old: Shared<E>,
        new: Shared<E>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            list,
            old,
            new,
            description: description.into(),
        }
    }

    fn swap(&self, from: &Shared<E>, to: &Shared<E>) -> CommandResult {
        let index = self
            .list
            .with(|items| position_of(items, from))
            .ok_or_else(|| not_found::<E>(&self.description))?;
        self.list.entry(index).set(Some(E::wrap(to.clone())));
        Ok(())
    }
}

impl<C, L, E> Command for ReplaceInList<C, L, E>
where
    C: ?Sized + Send + Sync + 'static,
    L: Clone + Send + Sync + 'static,
    E: ElementOf<L>,
{
    fn apply(&mut self) -> CommandResult {
        self.swap(&self.old, &self.new)
    }

    fn undo(&mut self) -> CommandResult {
        self.swap(&self.new, &self.old)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl<C, L, E> ValueCommand for ReplaceInList<C, L, E>
where
    C: ?Sized + Send + Sync + 'static,
    L: Clone + Send + Sync + 'static,
    E: ElementOf<L>,
{
    fn value(&self) -> Option<Target> {
        Some(self.new.target())
    }
}

impl<C: ?Sized, L, E> fmt::Debug for ReplaceInList<C, L, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplaceInList")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Swaps new contents into an existing value, keeping its identity.
///
/// Consecutive edits of the same value merge into one undo step.
pub struct EditInPlace<T> {
    target: Shared<T>,
    /// The contents not currently in `target`: the new value before
    /// `apply`, the old value after.
    stash: Option<T>,
    description: String,
}

impl<T: Send + Sync + 'static> EditInPlace<T> {
    pub fn new(target: Shared<T>, value: T, description: impl Into<String>) -> Self {
        Self {
            target,
            stash: Some(value),
            description: description.into(),
        }
    }

    fn swap(&mut self) -> CommandResult {
        let value = self.stash.take().ok_or_else(|| {
            CommandError::InvalidState(format!("{} has nothing to swap", self.description))
        })?;
        self.stash = Some(self.target.replace(value));
        Ok(())
    }
}

impl<T: Send + Sync + 'static> Command for EditInPlace<T> {
    fn apply(&mut self) -> CommandResult {
        self.swap()
    }

    fn undo(&mut self) -> CommandResult {
        self.swap()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn merge(&mut self, other: Box<dyn Command>) -> Option<Box<dyn Command>> {
        // Both already applied: our stash holds the oldest contents.
        let same_target = (*other)
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|next| next.target.ptr_eq(&self.target));
        if same_target { None } else { Some(other) }
    }
}

impl<T: Send + Sync + 'static> ValueCommand for EditInPlace<T> {
    fn value(&self) -> Option<Target> {
        Some(self.target.target())
    }
}

impl<T> fmt::Debug for EditInPlace<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditInPlace")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
