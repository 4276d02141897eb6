//! Editor handles handed to the host for a selected node.
//!
//! The engine never looks inside a handle. It only builds one through
//! [`NodeEditor::new`] and, for editors registered with a `_container_ref`
//! method, injects the owning container through
//! [`TargetContainerInject`].

use std::any::Any;
use std::sync::Arc;

use structedit_core::Shared;
use structedit_core::undo::CommandQueue;

use crate::Editable;
use crate::command::EditInPlace;

/// Opaque editor handle. Hosts downcast it to the editor type they
/// registered.
pub type EditorHandle = Box<dyn Any + Send>;

/// An editor for values of type `T`.
///
/// Editors never write to `target` directly: they push commands onto
/// `commands` so that every edit is undoable.
pub trait NodeEditor<T>: Send + 'static {
    fn new(target: Shared<T>, commands: Arc<CommandQueue>) -> Self
    where
        Self: Sized;
}

/// Editors that also need the container owning their target.
pub trait TargetContainerInject<C: ?Sized> {
    fn set_target_container(&mut self, container: Shared<C>);
}

/// Editor used when a description does not name one.
///
/// Holds the target and submits whole-value replacements on
/// [`commit`](Self::commit).
pub struct DefaultEditor<T> {
    target: Shared<T>,
    commands: Arc<CommandQueue>,
}

impl<T: Editable> DefaultEditor<T> {
    pub fn target(&self) -> &Shared<T> {
        &self.target
    }

    /// Queues an in-place edit replacing the target's contents with
    /// `value`. Returns `false`, queuing nothing, if `value` equals the
    /// current contents.
    pub fn commit(&self, value: T) -> bool {
        if *self.target.read() == value {
            return false;
        }
        let description = format!("Edit {}", short_type_name::<T>());
        self.commands.push(Box::new(EditInPlace::new(
            self.target.clone(),
            value,
            description,
        )));
        true
    }
}

impl<T: Editable> NodeEditor<T> for DefaultEditor<T> {
    fn new(target: Shared<T>, commands: Arc<CommandQueue>) -> Self {
        Self { target, commands }
    }
}

fn short_type_name<T>() -> &'static str {
    let name = std::any::type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}
