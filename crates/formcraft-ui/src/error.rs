//! Error types for tree edits and drag sessions.

use formcraft_core::math::Vec2;

use crate::tree::NodeId;

/// Structural errors raised by the layout tree.
///
/// Every variant is a programming error: the caller sequenced edits wrongly or
/// handed in a node from another tree. Nothing is repaired behind the caller's back.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeError {
    /// Node not found in tree.
    NodeNotFound(NodeId),
    /// `child` is not currently a child of `parent`.
    NotAChild { parent: NodeId, child: NodeId },
    /// The node cannot own children.
    NotAContainer(NodeId),
    /// The node already has a parent and must be removed first.
    AlreadyAttached(NodeId),
    /// Insertion index past the end of the children list.
    IndexOutOfBounds {
        parent: NodeId,
        index: usize,
        len: usize,
    },
    /// The root container cannot be moved, wrapped or removed.
    RootImmutable,
    /// Walking parent links did not terminate within the tree's size.
    AncestorCycle { node: NodeId, depth: usize },
    /// A tree-wide invariant does not hold.
    InvariantViolated(String),
    /// The layout engine rejected the tree.
    Layout(String),
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::NodeNotFound(id) => write!(f, "Node {:?} not found", id),
            TreeError::NotAChild { parent, child } => {
                write!(f, "Node {:?} is not a child of {:?}", child, parent)
            }
            TreeError::NotAContainer(id) => write!(f, "Node {:?} is not a container", id),
            TreeError::AlreadyAttached(id) => write!(f, "Node {:?} already has a parent", id),
            TreeError::IndexOutOfBounds { parent, index, len } => write!(
                f,
                "Index {} out of bounds for {:?} with {} children",
                index, parent, len
            ),
            TreeError::RootImmutable => write!(f, "The root container cannot be restructured"),
            TreeError::AncestorCycle { node, depth } => write!(
                f,
                "Parent chain of {:?} did not reach the root after {} steps",
                node, depth
            ),
            TreeError::InvariantViolated(msg) => write!(f, "Tree invariant violated: {}", msg),
            TreeError::Layout(msg) => write!(f, "Layout failed: {}", msg),
        }
    }
}

impl std::error::Error for TreeError {}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors raised by the drag session state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum DragError {
    /// A drag is already in progress (exclusive grab).
    AlreadyDragging,
    /// The operation needs an active drag.
    NotDragging,
    /// Only placed widgets can be picked up.
    NotDraggable(NodeId),
    /// No destination marker exists in the tree while one was required.
    MissingDestination,
    /// The pointer was released outside every canvas.
    NoCanvasUnderPointer { pos: Vec2 },
    /// A tree edit failed underneath the session.
    Tree(TreeError),
}

impl std::fmt::Display for DragError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DragError::AlreadyDragging => write!(f, "A drag is already in progress"),
            DragError::NotDragging => write!(f, "No drag in progress"),
            DragError::NotDraggable(id) => write!(f, "Node {:?} cannot be dragged", id),
            DragError::MissingDestination => {
                write!(f, "Wrong status: destination marker not present")
            }
            DragError::NoCanvasUnderPointer { pos } => write!(
                f,
                "Form canvas not found under pointer at ({}, {})",
                pos.x, pos.y
            ),
            DragError::Tree(e) => write!(f, "Tree edit failed: {}", e),
        }
    }
}

impl std::error::Error for DragError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DragError::Tree(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TreeError> for DragError {
    fn from(e: TreeError) -> Self {
        DragError::Tree(e)
    }
}

/// Result type for drag operations.
pub type DragResult<T> = Result<T, DragError>;
