//! Tree building.
//!
//! Starting from a root target, the builder dispatches for child nodes and
//! walks each child's target in turn. Parentage exists only as a product
//! of this walk; nodes carry no parent links.

use structedit_core::Target;

use crate::dispatch::{Dispatcher, TypeTable};
use crate::node::Node;

/// Child indices leading from the root level to a node.
pub type TreePath = Vec<usize>;

/// A node together with the nodes found in its target.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub node: Node,
    pub children: Vec<TreeNode>,
    /// Display hint: set along the path to the selection after a rebuild.
    pub expanded: bool,
}

/// Result of [`build_tree`].
#[derive(Debug, Default)]
pub struct BuiltTree {
    pub roots: Vec<TreeNode>,
    /// Path to the first node wrapping the requested reselect target.
    pub reselect: Option<TreePath>,
}

/// Builds the tree below `root`.
///
/// If `reselect` is given, the path to the first node (in pre-order)
/// whose target is identical to it is reported in
/// [`BuiltTree::reselect`].
///
/// A target that already appears among its own ancestors is shown but
/// not walked again, so back-references in the graph terminate.
pub fn build_tree(
    root: &Target,
    nodes: &Dispatcher<Node>,
    types: &TypeTable,
    reselect: Option<&Target>,
) -> BuiltTree {
    let mut walk = Walk {
        nodes,
        types,
        reselect,
        found: None,
        ancestors: Vec::new(),
        path: Vec::new(),
    };
    let roots = walk.children_of(root);
    BuiltTree {
        roots,
        reselect: walk.found,
    }
}

struct Walk<'a> {
    nodes: &'a Dispatcher<Node>,
    types: &'a TypeTable,
    reselect: Option<&'a Target>,
    found: Option<TreePath>,
    ancestors: Vec<Target>,
    path: TreePath,
}

impl Walk<'_> {
    fn children_of(&mut self, target: &Target) -> Vec<TreeNode> {
        self.ancestors.push(target.clone());
        let mut children = Vec::new();
        for (index, node) in self.nodes.dispatch(target, self.types).into_iter().enumerate() {
            self.path.push(index);
            if self.found.is_none() && self.reselect == Some(node.target()) {
                self.found = Some(self.path.clone());
            }
            let grandchildren = if self.ancestors.contains(node.target()) {
                log::warn!(
                    "cycle at {} ({}), not descending",
                    node.node_type(),
                    node.target().type_name()
                );
                Vec::new()
            } else {
                self.children_of(node.target())
            };
            self.path.pop();
            children.push(TreeNode {
                node,
                children: grandchildren,
                expanded: false,
            });
        }
        self.ancestors.pop();
        children
    }
}

pub fn node_at<'a>(roots: &'a [TreeNode], path: &[usize]) -> Option<&'a TreeNode> {
    let (first, rest) = path.split_first()?;
    let mut current = roots.get(*first)?;
    for index in rest {
        current = current.children.get(*index)?;
    }
    Some(current)
}

/// Path of the enclosing node, or `None` at the root level.
pub fn parent_path(path: &[usize]) -> Option<TreePath> {
    match path.len() {
        0 | 1 => None,
        n => Some(path[..n - 1].to_vec()),
    }
}

/// Path to the first node (in pre-order) wrapping `target`.
pub fn find_target(roots: &[TreeNode], target: &Target) -> Option<TreePath> {
    for (index, tree_node) in roots.iter().enumerate() {
        if tree_node.node.target() == target {
            return Some(vec![index]);
        }
        if let Some(mut rest) = find_target(&tree_node.children, target) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

/// Marks every node along `path`, the last one included, as expanded.
pub fn expand_path(roots: &mut [TreeNode], path: &[usize]) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };
    if let Some(tree_node) = roots.get_mut(*first) {
        tree_node.expanded = true;
        expand_path(&mut tree_node.children, rest);
    }
}

/// Total number of nodes in the forest.
pub fn count(roots: &[TreeNode]) -> usize {
    roots.iter().map(|n| 1 + count(&n.children)).sum()
}
