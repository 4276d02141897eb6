//! Host-facing controller tying descriptions, dispatch and the tree to a
//! document.

use std::sync::Arc;

use structedit_core::undo::{CommandManager, CommandQueue, ListenerId, TargetHolder, ValueCommand};
use structedit_core::{Shared, Target};

use crate::Editable;
use crate::description::ContainerDescription;
use crate::dispatch::{Dispatcher, TypeTable};
use crate::editor::{DefaultEditor, EditorHandle, NodeEditor};
use crate::error::{EditorError, EditorResult};
use crate::node::{Node, NodeCandidate};
use crate::rebuild::RebuildRequest;
use crate::settings::EditorSettings;
use crate::tree::{self, TreeNode, TreePath};

/// One entry of the "add" menu.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry {
    Candidate(NodeCandidate),
    /// Boundary between the contributions of two container descriptions.
    Separator,
}

struct Document<T> {
    manager: CommandManager<T>,
    listener: ListenerId,
}

/// Edits a document of root type `T` as a tree of nodes.
///
/// Container types are described once at startup. Opening a document
/// builds the tree. Every later change (executed, undone or redone
/// through the document's [`CommandManager`]) schedules a rebuild that
/// runs on the next [`on_idle`](Self::on_idle) call. Any number of changes
/// before that call cost one rebuild.
///
/// After a rebuild the node wrapping the previously selected value is
/// selected again, found by identity. If that value is gone the first
/// root-level node is selected.
///
/// # Example
///
/// ```ignore
/// let mut editor = StructureEditor::<AddressBook>::new(EditorSettings::default());
/// editor
///     .describe_root("Address Book", AddressBook::default)
///     .describe(ContainerDescription::<AddressBook>::new()
///         .plain_list("Group", |b| &mut b.groups, Group::default));
/// editor.open_document(sample_address_book());
///
/// editor.select(&[0, 0]);
/// let contact = editor.add_candidates()[0].clone();
/// editor.add(&contact)?;
/// editor.on_idle(); // rebuild; the new contact is selected
/// ```
pub struct StructureEditor<T: Editable> {
    settings: EditorSettings,
    types: TypeTable,
    nodes: Dispatcher<Node>,
    candidates: Dispatcher<Option<NodeCandidate>>,
    document: Option<Document<T>>,
    commands: Arc<CommandQueue>,
    rebuild: RebuildRequest,
    tree: Vec<TreeNode>,
    selection: Option<TreePath>,
    selected_target: Option<Target>,
}

impl<T: Editable> StructureEditor<T> {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            settings,
            types: TypeTable::new(),
            nodes: Dispatcher::new(),
            candidates: Dispatcher::new(),
            document: None,
            commands: Arc::new(CommandQueue::new()),
            rebuild: RebuildRequest::new(),
            tree: Vec::new(),
            selection: None,
            selected_target: None,
        }
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Describes the document root as a single node named `name`.
    ///
    /// The root sits in the root holder's slot, so it has a candidate
    /// (built with `factory`) that replaces the whole document.
    pub fn describe_root(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> T + Send + Sync + 'static,
    ) -> &mut Self {
        self.describe_root_with_editor::<DefaultEditor<T>>(name, factory)
    }

    pub fn describe_root_with_editor<Ed: NodeEditor<T>>(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> T + Send + Sync + 'static,
    ) -> &mut Self {
        self.describe(
            ContainerDescription::<TargetHolder<T>>::new().property_with_editor::<T, Ed>(
                name,
                |holder| &mut holder.target,
                factory,
            ),
        )
    }

    /// Registers the description of concrete container type `C`.
    pub fn describe<C: Send + Sync + 'static>(
        &mut self,
        description: ContainerDescription<C>,
    ) -> &mut Self {
        self.types.register::<C>();
        self.describe_interface(description)
    }

    /// Registers the description of declared type `K`, usually an
    /// interface (`dyn Trait`). It applies to every concrete type declared
    /// assignable to `K` with [`implements`](Self::implements).
    pub fn describe_interface<K: ?Sized + Send + Sync + 'static>(
        &mut self,
        mut description: ContainerDescription<K>,
    ) -> &mut Self {
        description.inherit_format(self.settings.format);
        let description = Arc::new(description);

        let for_nodes = description.clone();
        self.nodes.add::<K>(move |container| for_nodes.nodes_in(container));
        self.candidates.add::<K>(move |container| {
            description
                .candidates_for(container)
                .into_iter()
                .map(Some)
                .chain(std::iter::once(None))
                .collect()
        });
        log::debug!("described {}", std::any::type_name::<K>());
        self
    }

    /// Declares that concrete type `C` implements declared type `K`.
    ///
    /// ```ignore
    /// editor.implements::<Group, dyn ContactContainer>(|g| upcast!(g => dyn ContactContainer));
    /// ```
    pub fn implements<C, K>(
        &mut self,
        cast: impl Fn(Shared<C>) -> Shared<K> + Send + Sync + 'static,
    ) -> &mut Self
    where
        C: Send + Sync + 'static,
        K: ?Sized + 'static,
    {
        self.types.register_cast::<C, K>(cast);
        self
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    /// Nodes of every description `target` is assignable to.
    pub fn nodes_in(&self, target: &Target) -> Vec<Node> {
        self.nodes.dispatch(target, &self.types)
    }

    /// Candidates of every description `target` is assignable to. Each
    /// description's candidates end with a `None` separator.
    pub fn candidates_for(&self, target: &Target) -> Vec<Option<NodeCandidate>> {
        self.candidates.dispatch(target, &self.types)
    }

    // -----------------------------------------------------------------------
    // Document lifecycle
    // -----------------------------------------------------------------------

    /// Starts editing the document held by `manager` and builds the tree.
    ///
    /// Returns the previously open manager, if any.
    pub fn open(&mut self, mut manager: CommandManager<T>) -> Option<CommandManager<T>> {
        let previous = self.close();
        let rebuild = self.rebuild.clone();
        let listener = manager.subscribe(move || {
            rebuild.request();
        });
        self.document = Some(Document { manager, listener });
        self.rebuild.take();
        self.rebuild_tree();
        previous
    }

    /// Opens `root` in a new [`CommandManager`] configured from the
    /// settings.
    pub fn open_document(&mut self, root: T) -> Option<CommandManager<T>> {
        self.open(CommandManager::with_max_undo(root, self.settings.max_undo))
    }

    /// Stops editing and hands the manager back. Queued editor commands
    /// are discarded.
    pub fn close(&mut self) -> Option<CommandManager<T>> {
        let Document {
            mut manager,
            listener,
        } = self.document.take()?;
        manager.unsubscribe(listener);
        let dropped = self.commands.drain().len();
        if dropped > 0 {
            log::warn!("discarding {dropped} queued commands of the closed document");
        }
        self.rebuild.take();
        self.tree.clear();
        self.selection = None;
        self.selected_target = None;
        Some(manager)
    }

    pub fn manager(&self) -> Option<&CommandManager<T>> {
        self.document.as_ref().map(|d| &d.manager)
    }

    /// Mutable access to the manager. Changes made through it are picked
    /// up by the next [`on_idle`](Self::on_idle).
    pub fn manager_mut(&mut self) -> Option<&mut CommandManager<T>> {
        self.document.as_mut().map(|d| &mut d.manager)
    }

    /// The host's idle hook.
    ///
    /// Executes commands queued by editor handles, then rebuilds the tree
    /// if a change was signaled. Returns whether a rebuild ran.
    pub fn on_idle(&mut self) -> bool {
        for command in self.commands.drain() {
            match self.document.as_mut() {
                Some(document) => {
                    if let Err(e) = document.manager.execute(command) {
                        log::warn!("queued command failed: {e}");
                    }
                }
                None => log::warn!(
                    "dropping {}: no document is open",
                    command.description()
                ),
            }
        }
        if self.rebuild.take() {
            self.rebuild_tree();
            return true;
        }
        false
    }

    pub fn is_rebuild_pending(&self) -> bool {
        self.rebuild.is_pending()
    }

    /// Rebuilds the tree now, keeping the selection on the same value if
    /// it is still present.
    pub fn rebuild_tree(&mut self) {
        let Some(document) = &self.document else {
            self.tree.clear();
            self.selection = None;
            return;
        };
        let root = document.manager.holder().target();
        let built = tree::build_tree(
            &root,
            &self.nodes,
            &self.types,
            self.selected_target.as_ref(),
        );
        self.tree = built.roots;
        self.selection = built
            .reselect
            .or_else(|| (!self.tree.is_empty()).then(|| vec![0]));
        self.selected_target = self.selected_node().map(|n| n.target().clone());
        if self.settings.expand_selected
            && let Some(path) = &self.selection
        {
            tree::expand_path(&mut self.tree, path);
        }
        log::debug!(
            "rebuilt tree: {} nodes, selection {:?}",
            tree::count(&self.tree),
            self.selection
        );
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    pub fn tree(&self) -> &[TreeNode] {
        &self.tree
    }

    pub fn selection(&self) -> Option<&[usize]> {
        self.selection.as_deref()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        let path = self.selection.as_deref()?;
        tree::node_at(&self.tree, path).map(|n| &n.node)
    }

    /// Selects the node at `path`. Returns `false` if there is none.
    pub fn select(&mut self, path: &[usize]) -> bool {
        let Some(tree_node) = tree::node_at(&self.tree, path) else {
            return false;
        };
        self.selected_target = Some(tree_node.node.target().clone());
        self.selection = Some(path.to_vec());
        true
    }

    /// Selects the first node wrapping `target`.
    pub fn select_target(&mut self, target: &Target) -> bool {
        match tree::find_target(&self.tree, target) {
            Some(path) => self.select(&path),
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// The "add" menu for the selected node: candidates grouped by
    /// description, without the trailing separator.
    pub fn add_menu(&self) -> Vec<MenuEntry> {
        let Some(node) = self.selected_node() else {
            return Vec::new();
        };
        let mut entries: Vec<MenuEntry> = self
            .candidates_for(node.target())
            .into_iter()
            .map(|c| c.map_or(MenuEntry::Separator, MenuEntry::Candidate))
            .collect();
        if entries.last() == Some(&MenuEntry::Separator) {
            entries.pop();
        }
        entries
    }

    /// Candidates for the selected node, without separators.
    pub fn add_candidates(&self) -> Vec<NodeCandidate> {
        self.selected_node()
            .map(|node| self.candidates_for(node.target()).into_iter().flatten().collect())
            .unwrap_or_default()
    }

    /// Executes the create command of `candidate`. The created value is
    /// selected after the next rebuild.
    pub fn add(&mut self, candidate: &NodeCandidate) -> EditorResult {
        let command = candidate.create_command();
        let previous = std::mem::replace(&mut self.selected_target, command.value());
        if let Err(e) = self.execute(command) {
            self.selected_target = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Whether the selected node may be removed. Root-level nodes may not.
    pub fn can_remove(&self) -> bool {
        self.selection.as_ref().is_some_and(|path| path.len() > 1)
    }

    /// Removes the selected node's value. The selection moves to the
    /// node's parent first, and back again if the removal fails.
    pub fn remove(&mut self) -> EditorResult {
        let path = self.selection.clone().ok_or(EditorError::NoSelection)?;
        let parent = tree::parent_path(&path).ok_or(EditorError::RootNotRemovable)?;
        let node = tree::node_at(&self.tree, &path).ok_or(EditorError::NoSelection)?;
        let command = node.node.remove_command();
        if self.document.is_none() {
            return Err(EditorError::NotOpen);
        }
        let previous = self.selected_target.clone();
        self.select(&parent);
        if let Err(e) = self.execute(command) {
            self.selection = Some(path);
            self.selected_target = previous;
            return Err(e);
        }
        Ok(())
    }

    /// The selected value as text.
    pub fn serialized(&self) -> EditorResult<String> {
        let node = self.selected_node().ok_or(EditorError::NoSelection)?;
        Ok(node.serialized()?)
    }

    /// Writes the value parsed from `text` into the selected node's slot.
    ///
    /// Returns `Ok(false)` if the text describes the current value. A
    /// parse error leaves the graph and the selection untouched.
    pub fn update_serialized(&mut self, text: &str) -> EditorResult<bool> {
        let node = self.selected_node().ok_or(EditorError::NoSelection)?;
        let Some(command) = node.update_command(text)? else {
            return Ok(false);
        };
        if self.document.is_none() {
            return Err(EditorError::NotOpen);
        }
        if let Some(value) = command.value() {
            self.selected_target = Some(value);
        }
        self.execute(command)?;
        Ok(true)
    }

    /// Editor handle for the selected node. Edits made through it run on
    /// the next [`on_idle`](Self::on_idle).
    pub fn create_editor(&self) -> EditorResult<EditorHandle> {
        let node = self.selected_node().ok_or(EditorError::NoSelection)?;
        Ok(node.create_editor(&self.commands))
    }

    /// The queue editor handles submit to.
    pub fn commands(&self) -> &Arc<CommandQueue> {
        &self.commands
    }

    pub fn undo(&mut self) -> EditorResult {
        self.document_mut()?.manager.undo()?;
        Ok(())
    }

    pub fn redo(&mut self) -> EditorResult {
        self.document_mut()?.manager.redo()?;
        Ok(())
    }

    fn execute(&mut self, command: Box<dyn ValueCommand>) -> EditorResult {
        self.document_mut()?.manager.execute(command)?;
        Ok(())
    }

    fn document_mut(&mut self) -> EditorResult<&mut Document<T>> {
        self.document.as_mut().ok_or(EditorError::NotOpen)
    }
}

impl<T: Editable> Default for StructureEditor<T> {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Tag(String);

    impl Editable for Tag {}

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Note {
        tags: Vec<Shared<Tag>>,
    }

    impl Editable for Note {}

    fn note_editor() -> StructureEditor<Note> {
        let mut editor = StructureEditor::default();
        editor.describe_root("Note", Note::default).describe(
            ContainerDescription::<Note>::new().plain_list("Tag", |n| &mut n.tags, Tag::default),
        );
        editor
    }

    fn tagged(tags: &[&str]) -> Note {
        Note {
            tags: tags.iter().map(|t| Shared::new(Tag((*t).into()))).collect(),
        }
    }

    #[test]
    fn single_description_menu_has_no_separator() {
        let mut editor = note_editor();
        editor.open_document(tagged(&["a"]));
        assert_eq!(editor.add_menu().len(), 1);
        assert!(matches!(&editor.add_menu()[0], MenuEntry::Candidate(c) if c.node_type() == "Tag"));
    }

    #[test]
    fn close_discards_queued_commands() {
        let mut editor = note_editor();
        editor.open_document(tagged(&["a"]));
        assert!(editor.select(&[0, 0]));
        let handle = editor.create_editor().unwrap();
        let tag_editor = handle.downcast::<DefaultEditor<Tag>>().unwrap();
        assert!(tag_editor.commit(Tag("b".into())));

        let manager = editor.close().unwrap();
        assert!(editor.commands().is_empty());
        assert!(!editor.on_idle());
        assert_eq!(tag_editor.target().read().0, "a");
        assert!(!manager.can_undo());
    }

    #[test]
    fn settings_configure_opened_documents() {
        let mut editor = StructureEditor::<Note>::new(EditorSettings {
            max_undo: 2,
            expand_selected: false,
            ..Default::default()
        });
        editor.describe_root("Note", Note::default);
        editor.open_document(Note::default());
        assert_eq!(editor.manager().unwrap().history().max_undo(), 2);
        assert!(!editor.tree()[0].expanded);
    }
}
