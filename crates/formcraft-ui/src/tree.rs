//! Layout tree: containers, placed widgets and the destination marker.
//!
//! Nodes live in an arena keyed by [`NodeId`]. Containers own an ordered list of
//! children (layout order) and every child records its parent. The two links are
//! only ever changed together by [`LayoutTree::insert`] and [`LayoutTree::remove`],
//! so a node has at most one parent by construction.

use crate::dirty::DirtyFlags;
use crate::error::{TreeError, TreeResult};
use crate::widget::Widget;
use formcraft_core::alloc::HashSet;
use formcraft_core::config::{Orientation, SizeHint};
use formcraft_core::geometry::Rect;
use formcraft_core::profiling::profile_function;
use indexmap::IndexMap;

/// Node identifier in the layout tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Node bounds, origin at the bottom-left corner.
pub type LayoutRect = Rect<f32>;

/// Text shown by the destination marker.
pub const DESTINATION_TEXT: &str = "Widget goes here";

/// Spacing between the children of a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spacing {
    /// Same gap on both axes, as used by split boxes.
    Uniform(f32),
    /// `[horizontal, vertical]` gaps, as used by the root.
    Axes([f32; 2]),
}

impl Spacing {
    pub fn horizontal(&self) -> f32 {
        match *self {
            Spacing::Uniform(s) => s,
            Spacing::Axes([h, _]) => h,
        }
    }

    pub fn vertical(&self) -> f32 {
        match *self {
            Spacing::Uniform(s) => s,
            Spacing::Axes([_, v]) => v,
        }
    }
}

/// Per-node layout metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub size_hint: SizeHint,
    pub spacing: Option<Spacing>,
    /// `[left, top, right, bottom]`.
    pub padding: Option<[f32; 4]>,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            size_hint: SizeHint::default(),
            spacing: None,
            padding: None,
        }
    }
}

impl NodeStyle {
    /// Fixed height along with a size hint, the way placed widgets are sized.
    pub fn sized(height: f32, size_hint: SizeHint) -> Self {
        Self {
            height: Some(height),
            size_hint,
            ..Default::default()
        }
    }

    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn with_padding(mut self, padding: [f32; 4]) -> Self {
        self.padding = Some(padding);
        self
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Owns an ordered list of children laid out along `Orientation`.
    Container(Orientation),
    /// A placed widget.
    Leaf(Widget),
    /// Where the dragged widget will land.
    Destination,
}

impl NodeKind {
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Container(_))
    }

    pub fn is_destination(&self) -> bool {
        matches!(self, NodeKind::Destination)
    }

    pub fn orientation(&self) -> Option<Orientation> {
        match self {
            NodeKind::Container(orientation) => Some(*orientation),
            _ => None,
        }
    }

    pub fn widget(&self) -> Option<&Widget> {
        match self {
            NodeKind::Leaf(widget) => Some(widget),
            _ => None,
        }
    }
}

/// A node in the layout tree.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub kind: NodeKind,
    pub style: NodeStyle,
    pub dirty_flags: DirtyFlags,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl LayoutNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// The layout tree of one form canvas.
#[derive(Debug, Clone)]
pub struct LayoutTree {
    nodes: IndexMap<NodeId, LayoutNode>,
    root: NodeId,
    next_id: usize,
    dirty_nodes: HashSet<NodeId>,
    generation: u64,
}

impl LayoutTree {
    /// Create a tree holding only a root container.
    pub fn new(root_orientation: Orientation, root_style: NodeStyle) -> Self {
        let mut tree = Self {
            nodes: IndexMap::new(),
            root: NodeId(0),
            next_id: 0,
            dirty_nodes: HashSet::new(),
            generation: 0,
        };
        tree.root = tree.create_node(NodeKind::Container(root_orientation), root_style);
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    /// Add a detached node to the arena and return its id.
    pub fn create_node(&mut self, kind: NodeKind, style: NodeStyle) -> NodeId {
        let node_id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            node_id,
            LayoutNode {
                kind,
                style,
                dirty_flags: DirtyFlags::LAYOUT | DirtyFlags::STYLE,
                parent: None,
                children: Vec::new(),
            },
        );
        self.dirty_nodes.insert(node_id);
        node_id
    }

    pub fn create_leaf(&mut self, widget: Widget, style: NodeStyle) -> NodeId {
        self.create_node(NodeKind::Leaf(widget), style)
    }

    pub fn create_container(&mut self, orientation: Orientation, style: NodeStyle) -> NodeId {
        self.create_node(NodeKind::Container(orientation), style)
    }

    pub fn get(&self, node_id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(&node_id)
    }

    /// Like [`get`](Self::get), but a missing node is an error.
    pub fn node(&self, node_id: NodeId) -> TreeResult<&LayoutNode> {
        self.nodes
            .get(&node_id)
            .ok_or(TreeError::NodeNotFound(node_id))
    }

    pub fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(&node_id).and_then(|n| n.parent)
    }

    /// Children of a node; empty for leaves and unknown ids.
    pub fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node_id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Mutable access to a node's style. Marks the node `STYLE` dirty.
    pub fn style_mut(&mut self, node_id: NodeId) -> TreeResult<&mut NodeStyle> {
        if !self.nodes.contains_key(&node_id) {
            return Err(TreeError::NodeNotFound(node_id));
        }
        self.mark_dirty_flags(node_id, DirtyFlags::STYLE);
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(TreeError::NodeNotFound(node_id))?;
        Ok(&mut node.style)
    }

    /// Replace a leaf's widget text. Returns whether it changed.
    pub fn set_text(&mut self, node_id: NodeId, text: impl Into<String>) -> TreeResult<bool> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(TreeError::NodeNotFound(node_id))?;
        let NodeKind::Leaf(widget) = &mut node.kind else {
            return Ok(false);
        };
        let text = text.into();
        if !widget.kind.has_text() || widget.text.as_deref() == Some(text.as_str()) {
            return Ok(false);
        }
        widget.text = Some(text);
        self.mark_dirty_flags(node_id, DirtyFlags::TEXT);
        Ok(true)
    }

    /// Position of `child` within `parent`'s children.
    ///
    /// A miss means the caller holds a stale view of the tree and is reported as
    /// [`TreeError::NotAChild`].
    pub fn index_of(&self, parent: NodeId, child: NodeId) -> TreeResult<usize> {
        self.node(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(TreeError::NotAChild { parent, child })
    }

    /// Insert a detached `node` as child of `parent` at `index`, shifting later siblings.
    pub fn insert(&mut self, parent: NodeId, node: NodeId, index: usize) -> TreeResult<()> {
        profile_function!();

        if node == self.root {
            return Err(TreeError::RootImmutable);
        }
        let child = self.node(node)?;
        if child.parent.is_some() {
            return Err(TreeError::AlreadyAttached(node));
        }
        let parent_node = self.node(parent)?;
        if !parent_node.kind.is_container() {
            return Err(TreeError::NotAContainer(parent));
        }
        let len = parent_node.children.len();
        if index > len {
            return Err(TreeError::IndexOutOfBounds { parent, index, len });
        }
        if parent == node || self.ancestors(parent)?.contains(&node) {
            return Err(TreeError::AncestorCycle {
                node,
                depth: self.nodes.len(),
            });
        }

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.insert(index, node);
        }
        if let Some(child) = self.nodes.get_mut(&node) {
            child.parent = Some(parent);
        }

        self.mark_dirty_flags(parent, DirtyFlags::STRUCTURE);
        self.mark_dirty_flags(node, DirtyFlags::LAYOUT);
        Ok(())
    }

    /// Append a detached `node` to the end of `parent`.
    pub fn push(&mut self, parent: NodeId, node: NodeId) -> TreeResult<()> {
        let len = self.node(parent)?.children.len();
        self.insert(parent, node, len)
    }

    /// Detach `node` from `parent`. Returns the index it occupied.
    pub fn remove(&mut self, parent: NodeId, node: NodeId) -> TreeResult<usize> {
        profile_function!();

        let index = self.index_of(parent, node)?;
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.remove(index);
        }
        if let Some(child) = self.nodes.get_mut(&node) {
            child.parent = None;
        }

        self.mark_dirty_flags(parent, DirtyFlags::STRUCTURE);
        Ok(index)
    }

    /// Replace the child at `index` of `parent` with `replacement`, detaching the old child.
    pub fn replace(&mut self, parent: NodeId, index: usize, replacement: NodeId) -> TreeResult<NodeId> {
        if replacement == self.root {
            return Err(TreeError::RootImmutable);
        }
        if self.node(replacement)?.parent.is_some() {
            return Err(TreeError::AlreadyAttached(replacement));
        }
        let old = self
            .node(parent)?
            .children
            .get(index)
            .copied()
            .ok_or(TreeError::IndexOutOfBounds {
                parent,
                index,
                len: self.children(parent).len(),
            })?;
        self.remove(parent, old)?;
        self.insert(parent, replacement, index)?;
        Ok(old)
    }

    /// Put `node` (the child at `at_index` of `parent`) inside a new horizontal container.
    ///
    /// The new container takes `node`'s place and holds it as its only child. The
    /// caller is expected to add a second child before the edit completes.
    pub fn wrap(
        &mut self,
        parent: NodeId,
        node: NodeId,
        at_index: usize,
        style: NodeStyle,
    ) -> TreeResult<NodeId> {
        profile_function!();

        if node == self.root {
            return Err(TreeError::RootImmutable);
        }
        if self.children(parent).get(at_index) != Some(&node) {
            return Err(TreeError::NotAChild {
                parent,
                child: node,
            });
        }

        let container = self.create_container(Orientation::Horizontal, style);
        self.replace(parent, at_index, container)?;
        self.insert(container, node, 0)?;
        Ok(container)
    }

    /// Flatten a non-root container that is left with exactly one child.
    ///
    /// The child takes the container's place in the grandparent and the container is
    /// discarded. Applies one level only. Returns whether a collapse happened; a
    /// container that has already been collapsed away is a no-op.
    pub fn collapse_if_singleton(&mut self, container: NodeId) -> TreeResult<bool> {
        profile_function!();

        if container == self.root {
            return Ok(false);
        }
        let Some(node) = self.nodes.get(&container) else {
            return Ok(false);
        };
        if !node.kind.is_container() || node.children.len() != 1 {
            return Ok(false);
        }
        let Some(grandparent) = node.parent else {
            return Ok(false);
        };
        let only_child = node.children[0];

        let index = self.index_of(grandparent, container)?;
        self.remove(container, only_child)?;
        self.replace(grandparent, index, only_child)?;
        self.discard(container)?;

        tracing::trace!(
            "Collapsed {:?} into {:?}, keeping {:?}",
            container,
            grandparent,
            only_child
        );
        Ok(true)
    }

    /// Drop a detached node, and its subtree, from the arena.
    pub fn discard(&mut self, node_id: NodeId) -> TreeResult<()> {
        if node_id == self.root {
            return Err(TreeError::RootImmutable);
        }
        let node = self.node(node_id)?;
        if node.parent.is_some() {
            return Err(TreeError::AlreadyAttached(node_id));
        }

        let mut stack = vec![node_id];
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.nodes.shift_remove(&id) {
                stack.extend(removed.children);
            }
            self.dirty_nodes.remove(&id);
        }
        Ok(())
    }

    /// Parent chain of `node_id`, nearest first.
    ///
    /// The walk is bounded by the arena size; exceeding it means the parent links
    /// form a cycle and is reported as [`TreeError::AncestorCycle`].
    pub fn ancestors(&self, node_id: NodeId) -> TreeResult<Vec<NodeId>> {
        let mut visited = HashSet::new();
        let mut chain = Vec::new();
        let mut current = self.node(node_id)?.parent;

        while let Some(parent_id) = current {
            if !visited.insert(parent_id) || chain.len() > self.nodes.len() {
                return Err(TreeError::AncestorCycle {
                    node: node_id,
                    depth: chain.len(),
                });
            }
            chain.push(parent_id);
            current = self.node(parent_id)?.parent;
        }
        Ok(chain)
    }

    /// Whether `node_id` is reachable from the root.
    pub fn is_attached(&self, node_id: NodeId) -> TreeResult<bool> {
        if node_id == self.root {
            return Ok(true);
        }
        Ok(self.ancestors(node_id)?.last() == Some(&self.root))
    }

    /// Number of containers between `node_id` and the root, the root itself at 0.
    pub fn depth(&self, node_id: NodeId) -> TreeResult<usize> {
        Ok(self.ancestors(node_id)?.len())
    }

    /// The destination marker, if one is in the tree.
    pub fn destination(&self) -> Option<NodeId> {
        self.walk()
            .find(|&(id, _)| self.nodes.get(&id).is_some_and(|n| n.kind.is_destination()))
            .map(|(id, _)| id)
    }

    /// Number of destination markers reachable from the root.
    pub fn destination_count(&self) -> usize {
        self.walk()
            .filter(|&(id, _)| self.nodes.get(&id).is_some_and(|n| n.kind.is_destination()))
            .count()
    }

    /// Depth-first pre-order walk from the root, yielding `(node, depth)`.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            tree: self,
            stack: vec![(self.root, 0)],
        }
    }

    /// Check the structural invariants on the live tree.
    ///
    /// Every child must point back at its parent, no non-root container may have
    /// fewer than two children, and at most one destination marker may exist.
    pub fn validate(&self) -> TreeResult<()> {
        let mut seen = HashSet::new();
        let mut destinations = 0;

        for (id, _) in self.walk() {
            if !seen.insert(id) {
                return Err(TreeError::InvariantViolated(format!(
                    "{:?} is reachable twice",
                    id
                )));
            }
            let node = self.node(id)?;
            for &child in &node.children {
                let child_parent = self.node(child)?.parent;
                if child_parent != Some(id) {
                    return Err(TreeError::InvariantViolated(format!(
                        "{:?} is listed under {:?} but points at {:?}",
                        child, id, child_parent
                    )));
                }
            }
            match &node.kind {
                NodeKind::Container(_) if id != self.root && node.children.len() < 2 => {
                    return Err(TreeError::InvariantViolated(format!(
                        "container {:?} has {} children",
                        id,
                        node.children.len()
                    )));
                }
                NodeKind::Leaf(_) | NodeKind::Destination if !node.children.is_empty() => {
                    return Err(TreeError::InvariantViolated(format!(
                        "non-container {:?} has children",
                        id
                    )));
                }
                NodeKind::Destination => destinations += 1,
                _ => {}
            }
        }

        if destinations > 1 {
            return Err(TreeError::InvariantViolated(format!(
                "{} destination markers in tree",
                destinations
            )));
        }
        Ok(())
    }

    /// Mark a node with dirty flags and propagate layout changes to ancestors.
    pub fn mark_dirty_flags(&mut self, node_id: NodeId, flags: DirtyFlags) {
        if flags.is_empty() {
            return;
        }
        let Some(node) = self.nodes.get_mut(&node_id) else {
            return;
        };
        node.dirty_flags |= flags;
        self.dirty_nodes.insert(node_id);

        if !flags.should_propagate_to_parent() {
            return;
        }
        let propagation = flags.propagation_flags();
        let mut current = node.parent;
        let mut steps = 0;
        while let Some(parent_id) = current {
            steps += 1;
            if steps > self.nodes.len() {
                tracing::warn!("Dirty propagation from {:?} hit a parent cycle", node_id);
                break;
            }
            let Some(parent) = self.nodes.get_mut(&parent_id) else {
                break;
            };
            if parent.dirty_flags.contains(propagation) && self.dirty_nodes.contains(&parent_id) {
                break;
            }
            parent.dirty_flags |= propagation;
            self.dirty_nodes.insert(parent_id);
            current = parent.parent;
        }
    }

    /// Nodes changed since the last [`clear_dirty`](Self::clear_dirty).
    pub fn dirty_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.dirty_nodes.iter().copied()
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty_nodes.is_empty()
    }

    /// Clear all dirty flags after rendering.
    pub fn clear_dirty(&mut self) {
        for node in self.nodes.values_mut() {
            node.dirty_flags = DirtyFlags::NONE;
        }
        self.dirty_nodes.clear();
    }

    /// Count of completed edits. Readers compare it to detect changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Close an edit: every intermediate state is now behind us.
    pub(crate) fn finish_edit(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Pre-order iterator over the attached part of a [`LayoutTree`].
pub struct Walk<'a> {
    tree: &'a LayoutTree,
    stack: Vec<(NodeId, usize)>,
}

impl Iterator for Walk<'_> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        let children = self.tree.children(id);
        self.stack
            .extend(children.iter().rev().map(|&child| (child, depth + 1)));
        Some((id, depth))
    }
}
