use std::marker::PhantomData;
use std::sync::Arc;

use structedit_core::Shared;
use structedit_core::undo::{CommandQueue, ValueCommand};

use crate::command::{AddToList, RemoveFromList, ReplaceInList};
use crate::editor::{DefaultEditor, EditorHandle, NodeEditor, TargetContainerInject};
use crate::element::ElementOf;
use crate::format::{CodecError, Format};
use crate::node::{Node, NodeCandidate, NodeEntry};
use crate::pointer::{Accessor, ListPointer};

use super::{Description, EditorFactory, Factory, container_ref_editor, plain_editor};

/// An ordered list slot whose items may hold several element types.
///
/// Each item becomes a node of the **first** registered element type that
/// accepts it. Items no registered type accepts are left out of the tree.
/// Candidates are offered per registered element type, not per item.
pub struct ListDescription<C: ?Sized, L> {
    accessor: Accessor<C, Vec<L>>,
    elements: Vec<Box<dyn ElementDescription<C, L>>>,
}

impl<C, L> ListDescription<C, L>
where
    C: ?Sized + Send + Sync + 'static,
    L: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(accessor: Accessor<C, Vec<L>>) -> Self {
        Self {
            accessor,
            elements: Vec::new(),
        }
    }

    /// Registers element type `E` under `name`, edited with the
    /// [`DefaultEditor`].
    pub fn element<E: ElementOf<L>>(
        self,
        name: impl Into<String>,
        factory: impl Fn() -> E + Send + Sync + 'static,
    ) -> Self {
        self.element_with_editor::<E, DefaultEditor<E>>(name, factory)
    }

    pub fn element_with_editor<E: ElementOf<L>, Ed: NodeEditor<E>>(
        self,
        name: impl Into<String>,
        factory: impl Fn() -> E + Send + Sync + 'static,
    ) -> Self {
        self.push(name.into(), Arc::new(factory), plain_editor::<C, E, Ed>())
    }

    /// Registers element type `E` edited with `Ed`, which receives the
    /// container owning the list.
    pub fn element_container_ref<E, Ed>(
        self,
        name: impl Into<String>,
        factory: impl Fn() -> E + Send + Sync + 'static,
    ) -> Self
    where
        E: ElementOf<L>,
        Ed: NodeEditor<E> + TargetContainerInject<C>,
    {
        self.push(
            name.into(),
            Arc::new(factory),
            container_ref_editor::<C, E, Ed>(),
        )
    }

    fn push<E: ElementOf<L>>(
        mut self,
        name: String,
        factory: Factory<E>,
        editor: EditorFactory<C, E>,
    ) -> Self {
        self.elements.push(Box::new(ElementType {
            name,
            factory,
            editor,
            _item: PhantomData,
        }));
        self
    }

    /// Number of registered element types.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<C, L> Description<C> for ListDescription<C, L>
where
    C: ?Sized + Send + Sync + 'static,
    L: Clone + Send + Sync + 'static,
{
    fn nodes_in(&self, container: &Shared<C>, format: Format) -> Vec<Node> {
        let list = ListPointer::new(container.clone(), self.accessor);
        list.snapshot()
            .iter()
            .filter_map(|item| {
                let node = self
                    .elements
                    .iter()
                    .find_map(|element| element.node_for(&list, item, format));
                if node.is_none() {
                    log::debug!(
                        "no element type registered for a {} item, skipping it",
                        std::any::type_name::<L>()
                    );
                }
                node
            })
            .collect()
    }

    fn candidates_for(&self, container: &Shared<C>) -> Vec<NodeCandidate> {
        let list = ListPointer::new(container.clone(), self.accessor);
        self.elements
            .iter()
            .map(|element| element.candidate(&list))
            .collect()
    }
}

trait ElementDescription<C: ?Sized, L>: Send + Sync {
    /// A node for `item` if it holds this element type.
    fn node_for(&self, list: &ListPointer<C, L>, item: &L, format: Format) -> Option<Node>;

    fn candidate(&self, list: &ListPointer<C, L>) -> NodeCandidate;
}

struct ElementType<C: ?Sized, L, E> {
    name: String,
    factory: Factory<E>,
    editor: EditorFactory<C, E>,
    _item: PhantomData<fn() -> L>,
}

impl<C, L, E> ElementDescription<C, L> for ElementType<C, L, E>
where
    C: ?Sized + Send + Sync + 'static,
    L: Clone + Send + Sync + 'static,
    E: ElementOf<L>,
{
    fn node_for(&self, list: &ListPointer<C, L>, item: &L, format: Format) -> Option<Node> {
        let element = E::unwrap(item)?;
        let target = element.target();
        let entry = ElementEntry {
            name: self.name.clone(),
            list: list.clone(),
            element,
            format,
            editor: self.editor.clone(),
        };
        Some(Node::new(
            self.name.clone(),
            E::description(),
            target,
            Arc::new(entry),
        ))
    }

    fn candidate(&self, list: &ListPointer<C, L>) -> NodeCandidate {
        let list = list.clone();
        let factory = self.factory.clone();
        let description = format!("Add {}", self.name);
        NodeCandidate::new(
            self.name.clone(),
            E::description(),
            move || -> Box<dyn ValueCommand> {
                Box::new(AddToList::new(
                    list.clone(),
                    Shared::new(factory()),
                    description.clone(),
                ))
            },
        )
    }
}

struct ElementEntry<C: ?Sized, L, E> {
    name: String,
    list: ListPointer<C, L>,
    element: Shared<E>,
    format: Format,
    editor: EditorFactory<C, E>,
}

impl<C, L, E> NodeEntry for ElementEntry<C, L, E>
where
    C: ?Sized + Send + Sync + 'static,
    L: Clone + Send + Sync + 'static,
    E: ElementOf<L>,
{
    fn serialized(&self) -> Result<String, CodecError> {
        self.format.encode(&*self.element.read())
    }

    fn update_command(&self, text: &str) -> Result<Option<Box<dyn ValueCommand>>, CodecError> {
        let parsed: E = self.format.decode(text)?;
        if *self.element.read() == parsed {
            return Ok(None);
        }
        Ok(Some(Box::new(ReplaceInList::new(
            self.list.clone(),
            self.element.clone(),
            Shared::new(parsed),
            format!("Modify {}", self.name),
        ))))
    }

    fn remove_command(&self) -> Box<dyn ValueCommand> {
        Box::new(RemoveFromList::new(
            self.list.clone(),
            self.element.clone(),
            format!("Remove {}", self.name),
        ))
    }

    fn create_editor(&self, commands: Arc<CommandQueue>) -> EditorHandle {
        (self.editor)(self.element.clone(), self.list.container(), commands)
    }
}
