use serde::Serialize;
use serde::de::DeserializeOwned;

/// A value type that can appear as a node in the structure tree.
///
/// Values round-trip through [`Format`](crate::Format) text and are
/// compared by value to decide whether an edit changed anything.
pub trait Editable: Serialize + DeserializeOwned + PartialEq + Send + Sync + 'static {
    /// Human-readable description shown next to the node type.
    fn description() -> Option<&'static str> {
        None
    }
}
