use std::sync::Arc;

use structedit_core::Shared;
use structedit_core::undo::{CommandQueue, ValueCommand};

use crate::Editable;
use crate::command::SetValue;
use crate::editor::EditorHandle;
use crate::format::{CodecError, Format};
use crate::node::{Node, NodeCandidate, NodeEntry};
use crate::pointer::{Accessor, ValuePointer};

use super::{Description, EditorFactory, Factory};

/// A single optional slot of type `P`.
///
/// An empty slot produces no node, only a candidate. The candidate is
/// offered even when the slot is occupied: creating it again resets the
/// value.
pub(crate) struct PropertyDescription<C: ?Sized, P> {
    name: String,
    accessor: Accessor<C, Option<Shared<P>>>,
    factory: Factory<P>,
    editor: EditorFactory<C, P>,
}

impl<C, P> PropertyDescription<C, P>
where
    C: ?Sized + Send + Sync + 'static,
    P: Editable,
{
    pub(crate) fn new(
        name: String,
        accessor: Accessor<C, Option<Shared<P>>>,
        factory: Factory<P>,
        editor: EditorFactory<C, P>,
    ) -> Self {
        Self {
            name,
            accessor,
            factory,
            editor,
        }
    }

    fn pointer(&self, container: &Shared<C>) -> ValuePointer<Option<Shared<P>>> {
        ValuePointer::field(container.clone(), self.accessor)
    }
}

impl<C, P> Description<C> for PropertyDescription<C, P>
where
    C: ?Sized + Send + Sync + 'static,
    P: Editable,
{
    fn nodes_in(&self, container: &Shared<C>, format: Format) -> Vec<Node> {
        let pointer = self.pointer(container);
        let Some(value) = pointer.get() else {
            return Vec::new();
        };
        let target = value.target();
        let entry = PropertyEntry {
            name: self.name.clone(),
            pointer,
            value,
            container: container.clone(),
            format,
            editor: self.editor.clone(),
        };
        vec![Node::new(
            self.name.clone(),
            P::description(),
            target,
            Arc::new(entry),
        )]
    }

    fn candidates_for(&self, container: &Shared<C>) -> Vec<NodeCandidate> {
        let pointer = self.pointer(container);
        let factory = self.factory.clone();
        let description = format!("Set {}", self.name);
        vec![NodeCandidate::new(
            self.name.clone(),
            P::description(),
            move || -> Box<dyn ValueCommand> {
                Box::new(SetValue::new(
                    pointer.clone(),
                    Some(Shared::new(factory())),
                    description.clone(),
                ))
            },
        )]
    }
}

struct PropertyEntry<C: ?Sized, P> {
    name: String,
    pointer: ValuePointer<Option<Shared<P>>>,
    value: Shared<P>,
    container: Shared<C>,
    format: Format,
    editor: EditorFactory<C, P>,
}

impl<C, P> NodeEntry for PropertyEntry<C, P>
where
    C: ?Sized + Send + Sync + 'static,
    P: Editable,
{
    fn serialized(&self) -> Result<String, CodecError> {
        self.format.encode(&*self.value.read())
    }

    fn update_command(&self, text: &str) -> Result<Option<Box<dyn ValueCommand>>, CodecError> {
        let parsed: P = self.format.decode(text)?;
        if let Some(current) = self.pointer.get()
            && *current.read() == parsed
        {
            return Ok(None);
        }
        Ok(Some(Box::new(SetValue::new(
            self.pointer.clone(),
            Some(Shared::new(parsed)),
            format!("Modify {}", self.name),
        ))))
    }

    fn remove_command(&self) -> Box<dyn ValueCommand> {
        Box::new(SetValue::new(
            self.pointer.clone(),
            None,
            format!("Remove {}", self.name),
        ))
    }

    fn create_editor(&self, commands: Arc<CommandQueue>) -> EditorHandle {
        (self.editor)(self.value.clone(), &self.container, commands)
    }
}
