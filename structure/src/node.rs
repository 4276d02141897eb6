//! Nodes and node candidates.
//!
//! A [`Node`] describes a value that is present in the graph right now.
//! A [`NodeCandidate`] describes a value that could be created. Both are
//! rebuilt from scratch on every tree rebuild and never mutated.

use std::fmt;
use std::sync::Arc;

use structedit_core::Target;
use structedit_core::undo::{CommandQueue, ValueCommand};

use crate::editor::EditorHandle;
use crate::format::CodecError;

/// Behavior behind a [`Node`], supplied by the description that made it.
pub(crate) trait NodeEntry: Send + Sync {
    fn serialized(&self) -> Result<String, CodecError>;

    fn update_command(&self, text: &str) -> Result<Option<Box<dyn ValueCommand>>, CodecError>;

    fn remove_command(&self) -> Box<dyn ValueCommand>;

    fn create_editor(&self, commands: Arc<CommandQueue>) -> EditorHandle;
}

/// An editable value currently present in the graph.
#[derive(Clone)]
pub struct Node {
    node_type: String,
    description: Option<String>,
    target: Target,
    entry: Arc<dyn NodeEntry>,
}

impl Node {
    pub(crate) fn new(
        node_type: impl Into<String>,
        description: Option<&'static str>,
        target: Target,
        entry: Arc<dyn NodeEntry>,
    ) -> Self {
        Self {
            node_type: node_type.into(),
            description: description.map(str::to_owned),
            target,
            entry,
        }
    }

    /// Display name, e.g. `"Home Address"`.
    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The edited value.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Whether both nodes wrap the same value (by identity).
    pub fn same_target(&self, other: &Node) -> bool {
        self.target == other.target
    }

    /// The value as text.
    pub fn serialized(&self) -> Result<String, CodecError> {
        self.entry.serialized()
    }

    /// Builds a command writing the value parsed from `text`.
    ///
    /// Returns `Ok(None)` when `text` parses to a value equal to the
    /// current one. A parse failure is returned as is and nothing is
    /// written.
    pub fn update_command(&self, text: &str) -> Result<Option<Box<dyn ValueCommand>>, CodecError> {
        self.entry.update_command(text)
    }

    /// Builds a command removing the value from its slot.
    pub fn remove_command(&self) -> Box<dyn ValueCommand> {
        self.entry.remove_command()
    }

    /// Builds the editor registered for this value. Edits made through
    /// it are pushed onto `commands`.
    pub fn create_editor(&self, commands: &Arc<CommandQueue>) -> EditorHandle {
        self.entry.create_editor(commands.clone())
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.node_type == other.node_type
            && self.description == other.description
            && self.target == other.target
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_label(f, &self.node_type, self.description.as_deref())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("node_type", &self.node_type)
            .field("description", &self.description)
            .field("target", &self.target)
            .finish()
    }
}

type CreateFn = dyn Fn() -> Box<dyn ValueCommand> + Send + Sync;

/// A value that could be created in a container.
#[derive(Clone)]
pub struct NodeCandidate {
    node_type: String,
    description: Option<String>,
    create: Arc<CreateFn>,
}

impl NodeCandidate {
    pub(crate) fn new(
        node_type: impl Into<String>,
        description: Option<&'static str>,
        create: impl Fn() -> Box<dyn ValueCommand> + Send + Sync + 'static,
    ) -> Self {
        Self {
            node_type: node_type.into(),
            description: description.map(str::to_owned),
            create: Arc::new(create),
        }
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Builds a command creating a fresh value. Each call constructs a new
    /// value.
    pub fn create_command(&self) -> Box<dyn ValueCommand> {
        (self.create)()
    }
}

impl PartialEq for NodeCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.node_type == other.node_type && self.description == other.description
    }
}

impl fmt::Display for NodeCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_label(f, &self.node_type, self.description.as_deref())
    }
}

impl fmt::Debug for NodeCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeCandidate")
            .field("node_type", &self.node_type)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

fn write_label(f: &mut fmt::Formatter<'_>, name: &str, description: Option<&str>) -> fmt::Result {
    match description {
        Some(description) => write!(f, "{name} ({description})"),
        None => f.write_str(name),
    }
}
