//! Declarative descriptions of container types.
//!
//! A [`ContainerDescription`] lists, in display order, the slots of one
//! container type that appear in the tree:
//!
//! - **properties**: single optional values (`Option<Shared<P>>` fields)
//! - **lists**: ordered collections whose items may hold several element
//!   types, see [`ListDescription`]
//!
//! Descriptions are registered once with a
//! [`StructureEditor`](crate::StructureEditor) and then apply wherever the
//! container type, or an interface it implements, occurs in the graph.
//!
//! # Example
//!
//! ```ignore
//! ContainerDescription::<Contact>::new()
//!     .property("Home Address", |c| &mut c.home_address, Address::default)
//!     .list(|c| &mut c.phone_numbers, |list| {
//!         list.element("Landline Number", LandlineNumber::default)
//!             .element("Mobile Number", MobileNumber::default)
//!     })
//! ```

mod list;
mod property;

use std::sync::Arc;

use structedit_core::Shared;
use structedit_core::undo::CommandQueue;

use crate::Editable;
use crate::editor::{DefaultEditor, EditorHandle, NodeEditor, TargetContainerInject};
use crate::format::Format;
use crate::node::{Node, NodeCandidate};
use crate::pointer::Accessor;

pub use list::ListDescription;

use property::PropertyDescription;

/// One slot of a container type.
pub(crate) trait Description<C: ?Sized>: Send + Sync {
    /// Nodes for the values currently present in `container`.
    fn nodes_in(&self, container: &Shared<C>, format: Format) -> Vec<Node>;

    /// Candidates for values that could be created in `container`.
    fn candidates_for(&self, container: &Shared<C>) -> Vec<NodeCandidate>;
}

pub(crate) type Factory<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Builds the editor handle for a value owned by a container `C`.
pub(crate) type EditorFactory<C, T> =
    Arc<dyn Fn(Shared<T>, &Shared<C>, Arc<CommandQueue>) -> EditorHandle + Send + Sync>;

pub(crate) fn plain_editor<C, T, Ed>() -> EditorFactory<C, T>
where
    C: ?Sized + 'static,
    T: 'static,
    Ed: NodeEditor<T>,
{
    Arc::new(
        |target: Shared<T>, _container: &Shared<C>, commands: Arc<CommandQueue>| -> EditorHandle {
            Box::new(Ed::new(target, commands))
        },
    )
}

pub(crate) fn container_ref_editor<C, T, Ed>() -> EditorFactory<C, T>
where
    C: ?Sized + 'static,
    T: 'static,
    Ed: NodeEditor<T> + TargetContainerInject<C>,
{
    Arc::new(
        |target: Shared<T>, container: &Shared<C>, commands: Arc<CommandQueue>| -> EditorHandle {
            let mut editor = Ed::new(target, commands);
            editor.set_target_container(container.clone());
            Box::new(editor)
        },
    )
}

/// Ordered descriptions of the slots of container type `C`.
///
/// `C` may be an unsized interface (`dyn Trait`) to describe every type
/// implementing it at once.
pub struct ContainerDescription<C: ?Sized> {
    descriptions: Vec<Box<dyn Description<C>>>,
    format: Option<Format>,
}

impl<C: ?Sized + Send + Sync + 'static> ContainerDescription<C> {
    pub fn new() -> Self {
        Self {
            descriptions: Vec::new(),
            format: None,
        }
    }

    /// Pins the text format for nodes of this container. Without it the
    /// editor's configured format is used.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn format(&self) -> Option<Format> {
        self.format
    }

    pub(crate) fn inherit_format(&mut self, fallback: Format) {
        self.format.get_or_insert(fallback);
    }

    /// Adds an optional property edited with the [`DefaultEditor`].
    ///
    /// `factory` builds the value a candidate creates.
    pub fn property<P: Editable>(
        self,
        name: impl Into<String>,
        accessor: Accessor<C, Option<Shared<P>>>,
        factory: impl Fn() -> P + Send + Sync + 'static,
    ) -> Self {
        self.property_with_editor::<P, DefaultEditor<P>>(name, accessor, factory)
    }

    /// Adds an optional property edited with `Ed`.
    pub fn property_with_editor<P: Editable, Ed: NodeEditor<P>>(
        self,
        name: impl Into<String>,
        accessor: Accessor<C, Option<Shared<P>>>,
        factory: impl Fn() -> P + Send + Sync + 'static,
    ) -> Self {
        self.push(PropertyDescription::new(
            name.into(),
            accessor,
            Arc::new(factory),
            plain_editor::<C, P, Ed>(),
        ))
    }

    /// Adds an optional property edited with `Ed`, which receives the
    /// owning container.
    pub fn property_container_ref<P, Ed>(
        self,
        name: impl Into<String>,
        accessor: Accessor<C, Option<Shared<P>>>,
        factory: impl Fn() -> P + Send + Sync + 'static,
    ) -> Self
    where
        P: Editable,
        Ed: NodeEditor<P> + TargetContainerInject<C>,
    {
        self.push(PropertyDescription::new(
            name.into(),
            accessor,
            Arc::new(factory),
            container_ref_editor::<C, P, Ed>(),
        ))
    }

    /// Adds a list slot. `build` registers its element types, in
    /// precedence order.
    pub fn list<L>(
        self,
        accessor: Accessor<C, Vec<L>>,
        build: impl FnOnce(ListDescription<C, L>) -> ListDescription<C, L>,
    ) -> Self
    where
        L: Clone + Send + Sync + 'static,
    {
        self.push(build(ListDescription::new(accessor)))
    }

    /// Adds a list holding a single element type.
    pub fn plain_list<E: Editable>(
        self,
        name: impl Into<String>,
        accessor: Accessor<C, Vec<Shared<E>>>,
        factory: impl Fn() -> E + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        self.list(accessor, move |list| list.element::<E>(name, factory))
    }

    pub fn plain_list_with_editor<E: Editable, Ed: NodeEditor<E>>(
        self,
        name: impl Into<String>,
        accessor: Accessor<C, Vec<Shared<E>>>,
        factory: impl Fn() -> E + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        self.list(accessor, move |list| {
            list.element_with_editor::<E, Ed>(name, factory)
        })
    }

    pub fn plain_list_container_ref<E, Ed>(
        self,
        name: impl Into<String>,
        accessor: Accessor<C, Vec<Shared<E>>>,
        factory: impl Fn() -> E + Send + Sync + 'static,
    ) -> Self
    where
        E: Editable,
        Ed: NodeEditor<E> + TargetContainerInject<C>,
    {
        let name = name.into();
        self.list(accessor, move |list| {
            list.element_container_ref::<E, Ed>(name, factory)
        })
    }

    fn push(mut self, description: impl Description<C> + 'static) -> Self {
        self.descriptions.push(Box::new(description));
        self
    }

    /// Nodes for every value present in `container`, in description order.
    pub fn nodes_in(&self, container: &Shared<C>) -> Vec<Node> {
        let format = self.format.unwrap_or_default();
        self.descriptions
            .iter()
            .flat_map(|d| d.nodes_in(container, format))
            .collect()
    }

    /// Candidates for every value that could be created in `container`.
    pub fn candidates_for(&self, container: &Shared<C>) -> Vec<NodeCandidate> {
        self.descriptions
            .iter()
            .flat_map(|d| d.candidates_for(container))
            .collect()
    }

    /// Number of described slots.
    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}

impl<C: ?Sized + Send + Sync + 'static> Default for ContainerDescription<C> {
    fn default() -> Self {
        Self::new()
    }
}
