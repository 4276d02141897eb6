use structedit_core::undo::CommandError;

use crate::format::CodecError;

/// Errors reported by [`StructureEditor`](crate::StructureEditor)
/// operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("no document is open")]
    NotOpen,
    #[error("no node is selected")]
    NoSelection,
    #[error("a root-level node cannot be removed")]
    RootNotRemovable,
    /// The edited text did not parse. The graph is unchanged.
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Command(#[from] CommandError),
}

pub type EditorResult<T = ()> = Result<T, EditorError>;
