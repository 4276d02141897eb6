//! Editor configuration.
//!
//! Settings are plain serde data, typically loaded from a TOML file:
//!
//! ```toml
//! max_undo = 250
//! format = "json"
//! expand_selected = false
//! ```

use serde::{Deserialize, Serialize};
use structedit_core::undo::DEFAULT_MAX_UNDO;

use crate::format::Format;

/// Configuration of a [`StructureEditor`](crate::StructureEditor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Undo depth of documents opened through
    /// [`StructureEditor::open_document`](crate::StructureEditor::open_document).
    pub max_undo: usize,
    /// Text format for descriptions that do not pin one.
    pub format: Format,
    /// Expand the tree down to the selection after every rebuild.
    pub expand_selected: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            max_undo: DEFAULT_MAX_UNDO,
            format: Format::default(),
            expand_selected: true,
        }
    }
}

impl EditorSettings {
    /// Parses settings from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}
