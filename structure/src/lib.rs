//! # structedit
//!
//! Declarative structure editor engine. Describe each container type once
//! (which of its slots hold editable values, and which values could be
//! created there) and any object graph built from those types can be
//! browsed and edited as a tree, with every change undoable.
//!
//! ```ignore
//! let mut editor = StructureEditor::<AddressBook>::default();
//! editor
//!     .describe_root("Address Book", AddressBook::default)
//!     .describe(ContainerDescription::<Contact>::new()
//!         .property("Home Address", |c| &mut c.home_address, Address::default))
//!     .describe_interface(ContainerDescription::<dyn ContactContainer>::new()
//!         .plain_list("Contact", |c| c.contacts_mut(), Contact::default))
//!     .implements::<Group, dyn ContactContainer>(|g| upcast!(g => dyn ContactContainer));
//!
//! editor.open_document(book);
//! ```

pub mod command;
pub mod description;
pub mod dispatch;
pub mod editable;
pub mod editor;
pub mod element;
pub mod error;
pub mod format;
pub mod node;
pub mod pointer;
pub mod rebuild;
pub mod settings;
pub mod structure_editor;
pub mod tree;

pub use description::{ContainerDescription, ListDescription};
pub use dispatch::{Dispatcher, TypeTable};
pub use editable::Editable;
pub use editor::{DefaultEditor, EditorHandle, NodeEditor, TargetContainerInject};
pub use element::ElementOf;
pub use error::{EditorError, EditorResult};
pub use format::{CodecError, Format};
pub use node::{Node, NodeCandidate};
pub use pointer::{Accessor, ListPointer, ValuePointer};
pub use rebuild::RebuildRequest;
pub use settings::EditorSettings;
pub use structure_editor::{MenuEntry, StructureEditor};
pub use tree::{TreeNode, TreePath};

pub use structedit_core::{Shared, Target, undo, upcast};
