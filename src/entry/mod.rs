//! The cache classification tree.
//!
//! Entries form a hierarchy where every node is either a pure container
//! (child entries only) or a pure leaf (filesystem paths only), never both.
//! That exclusivity pins every reclaimable byte to exactly one leaf, which
//! makes size and selection rollups plain bottom-up folds.
//!
//! Nodes live in an arena and are addressed by [`EntryId`]; the parent link
//! is an optional index, so traversal works in both directions without any
//! ownership cycle. Size and selection are derived values: they go stale on
//! any mutation and stay stale until the explicit `recalculate_*` calls.

mod kind;

pub use kind::{EntryKind, OsFamily};

use std::path::PathBuf;

use humansize::{format_size, BINARY};

use crate::scanner::allocated_size;

/// Handle to a node in an [`EntryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(usize);

/// Size of an entry. `Unknown` until the first `recalculate_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    Unknown,
    Bytes(u64),
}

impl Size {
    pub fn bytes(self) -> Option<u64> {
        match self {
            Size::Bytes(bytes) => Some(bytes),
            Size::Unknown => None,
        }
    }
}

/// Tri-state selection, rolled up bottom-up from descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    On,
    Off,
    Mixed,
}

/// A single node of the cache tree.
#[derive(Debug, Clone)]
pub struct EntryNode {
    label: String,
    extra_info: String,
    tooltip: String,
    kind: EntryKind,
    size: Size,
    selection: Selection,
    paths: Vec<PathBuf>,
    children: Vec<EntryId>,
    parent: Option<EntryId>,
}

impl EntryNode {
    pub fn new(label: impl Into<String>, selected: bool) -> Self {
        let label = label.into();
        Self {
            tooltip: label.clone(),
            label,
            extra_info: String::new(),
            kind: EntryKind::Generic,
            size: Size::Unknown,
            selection: if selected { Selection::On } else { Selection::Off },
            paths: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn with_extra_info(mut self, extra_info: impl Into<String>) -> Self {
        self.extra_info = extra_info.into();
        self.tooltip = format!("{} {}", self.label, self.extra_info)
            .trim()
            .to_string();
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn extra_info(&self) -> &str {
        &self.extra_info
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_selected(&self) -> bool {
        self.selection != Selection::Off
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn children(&self) -> &[EntryId] {
        &self.children
    }

    pub fn parent(&self) -> Option<EntryId> {
        self.parent
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.paths.is_empty()
    }

    /// Description used for deletion reporting.
    pub fn full_description(&self) -> String {
        match &self.kind {
            EntryKind::Archive {
                project_name,
                version,
                build,
                ..
            } => format!(
                "{} {} ({}) ({})",
                project_name, version, build, self.extra_info
            ),
            _ => format!("{} {}", self.label, self.extra_info)
                .trim()
                .to_string(),
        }
    }
}

/// Arena holding every entry node.
///
/// The tree is not internally synchronized: all mutating calls for a given
/// scan/delete cycle must come from a single logical owner at a time.
#[derive(Debug, Default)]
pub struct EntryTree {
    nodes: Vec<Option<EntryNode>>,
    free: Vec<usize>,
}

impl EntryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a detached node, returning its id. Attach it with
    /// [`EntryTree::add_child`].
    pub fn insert(&mut self, node: EntryNode) -> EntryId {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                EntryId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                EntryId(self.nodes.len() - 1)
            }
        }
    }

    pub fn node(&self, id: EntryId) -> &EntryNode {
        self.nodes[id.0]
            .as_ref()
            .expect("entry id refers to a released node")
    }

    fn node_mut(&mut self, id: EntryId) -> &mut EntryNode {
        self.nodes[id.0]
            .as_mut()
            .expect("entry id refers to a released node")
    }

    /// Attach `child` under `parent`.
    ///
    /// Panics if `parent` already holds paths; a node is either a container
    /// or a leaf, and mixing them is a programming error, not a recoverable
    /// condition.
    pub fn add_child(&mut self, parent: EntryId, child: EntryId) {
        assert!(
            self.node(parent).paths.is_empty(),
            "cannot add child entries to an entry that already holds paths"
        );
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    pub fn add_children(&mut self, parent: EntryId, children: &[EntryId]) {
        for &child in children {
            self.add_child(parent, child);
        }
    }

    /// Attach a filesystem path to `id`.
    ///
    /// Panics if the node already holds children, mirroring
    /// [`EntryTree::add_child`].
    pub fn add_path(&mut self, id: EntryId, path: PathBuf) {
        assert!(
            self.node(id).children.is_empty(),
            "cannot add paths to an entry that already holds children"
        );
        self.node_mut(id).paths.push(path);
    }

    pub fn add_paths(&mut self, id: EntryId, paths: Vec<PathBuf>) {
        for path in paths {
            self.add_path(id, path);
        }
    }

    /// Remove all children and paths, returning the node to an empty
    /// container state. Released descendants are recycled by the arena.
    pub fn clear(&mut self, id: EntryId) {
        let children = std::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.release(child);
        }
        self.node_mut(id).paths.clear();
    }

    fn release(&mut self, id: EntryId) {
        if let Some(node) = self.nodes[id.0].take() {
            for child in node.children {
                self.release(child);
            }
            self.free.push(id.0);
        }
    }

    /// Force the node and its entire subtree to `On`, top-down.
    pub fn select_with_children(&mut self, id: EntryId) {
        self.set_selection_recursive(id, Selection::On);
    }

    /// Force the node and its entire subtree to `Off`, top-down.
    pub fn deselect_with_children(&mut self, id: EntryId) {
        self.set_selection_recursive(id, Selection::Off);
    }

    fn set_selection_recursive(&mut self, id: EntryId, selection: Selection) {
        self.node_mut(id).selection = selection;
        let children = self.node(id).children.clone();
        for child in children {
            self.set_selection_recursive(child, selection);
        }
    }

    /// Recompute and cache sizes, post-order.
    ///
    /// A node's size is the sum of its recalculated children plus, for leaf
    /// nodes, the allocated on-disk size of each path. Paths that no longer
    /// exist contribute 0.
    pub fn recalculate_size(&mut self, id: EntryId) -> Size {
        let children = self.node(id).children.clone();

        let mut total: u64 = 0;
        for child in children {
            if let Size::Bytes(bytes) = self.recalculate_size(child) {
                total += bytes;
            }
        }

        for path in self.node(id).paths.clone() {
            total += allocated_size(&path);
        }

        let size = Size::Bytes(total);
        self.node_mut(id).size = size;
        size
    }

    /// Recompute selection, post-order, as a pure fold of child states.
    ///
    /// A container with non-empty children rolls up: all children off means
    /// off, all on means on (mixed if any child is mixed), any split means
    /// mixed. A node with no non-empty children keeps its current selection
    /// unless it is entirely empty, which forces off.
    pub fn recalculate_selection(&mut self, id: EntryId) -> Selection {
        let children = self.node(id).children.clone();
        for &child in &children {
            self.recalculate_selection(child);
        }

        let non_empty = children
            .iter()
            .filter(|&&child| !self.node(child).is_empty())
            .count();

        let result = if non_empty > 0 {
            let selected = children
                .iter()
                .filter(|&&child| self.node(child).is_selected())
                .count();

            if selected == non_empty {
                let any_mixed = children
                    .iter()
                    .any(|&child| self.node(child).selection == Selection::Mixed);
                if any_mixed {
                    Selection::Mixed
                } else {
                    Selection::On
                }
            } else if selected == 0 {
                Selection::Off
            } else {
                Selection::Mixed
            }
        } else if self.node(id).is_empty() {
            Selection::Off
        } else {
            self.node(id).selection
        };

        self.node_mut(id).selection = result;
        result
    }

    /// Bytes that would be freed by deleting the current selection.
    ///
    /// Computed on the fly from cached sizes. A node's own size counts only
    /// when it is `On` and holds direct paths, so container levels are never
    /// double-counted.
    pub fn selected_size(&self, id: EntryId) -> u64 {
        let node = self.node(id);

        let mut result: u64 = node
            .children
            .iter()
            .map(|&child| self.selected_size(child))
            .sum();

        if node.selection == Selection::On && !node.paths.is_empty() {
            result += node.size.bytes().unwrap_or(0);
        }

        result
    }

    /// Indented textual dump of a subtree with formatted sizes.
    pub fn debug_representation(&self, id: EntryId) -> String {
        let mut result = String::new();
        self.debug_representation_into(id, 1, &mut result);
        result
    }

    fn debug_representation_into(&self, id: EntryId, level: usize, out: &mut String) {
        let node = self.node(id);

        out.push_str(&"\t".repeat(level));
        out.push_str(node.label());
        if let Some(bytes) = node.size.bytes() {
            out.push_str(&format!(": {}", format_size(bytes, BINARY)));
        }
        out.push('\n');

        for &child in &node.children {
            self.debug_representation_into(child, level + 1, out);
        }
    }
}

/// Walk `id` and its descendants, checking the container/leaf exclusivity.
/// Test helper, but kept callable from integration tests.
pub fn validate_exclusivity(tree: &EntryTree, id: EntryId) -> bool {
    let node = tree.node(id);
    if !node.paths().is_empty() && !node.children().is_empty() {
        return false;
    }
    node.children()
        .iter()
        .all(|&child| validate_exclusivity(tree, child))
}
