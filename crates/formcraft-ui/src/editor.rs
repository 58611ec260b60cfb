//! Tree edits driven by a drag session.
//!
//! Each operation is applied as one unit: it either completes and leaves the tree
//! consistent, or returns the first structural error it hits. The tree generation
//! is bumped once per completed operation.

use crate::error::{TreeError, TreeResult};
use crate::tree::{LayoutTree, NodeId, NodeKind, NodeStyle};
use crate::zone::DropZone;
use formcraft_core::profiling::profile_function;

/// An edit applied to a [`LayoutTree`].
pub trait EditOperation {
    /// Apply the edit.
    fn execute(&mut self, tree: &mut LayoutTree) -> TreeResult<()>;
}

/// Take a placed widget out of its container, leaving a destination marker in its slot.
#[derive(Debug)]
pub struct DetachOperation {
    /// The widget being picked up.
    pub widget: NodeId,
    /// Style given to the destination marker.
    pub marker_style: NodeStyle,
    /// The marker created by the operation.
    destination: Option<NodeId>,
}

impl DetachOperation {
    pub fn new(widget: NodeId, marker_style: NodeStyle) -> Self {
        Self {
            widget,
            marker_style,
            destination: None,
        }
    }

    /// The marker created by [`execute`](EditOperation::execute).
    pub fn destination(&self) -> Option<NodeId> {
        self.destination
    }
}

impl EditOperation for DetachOperation {
    fn execute(&mut self, tree: &mut LayoutTree) -> TreeResult<()> {
        profile_function!();

        if !matches!(tree.node(self.widget)?.kind, NodeKind::Leaf(_)) {
            return Err(TreeError::InvariantViolated(format!(
                "only placed widgets can be detached, got {:?}",
                self.widget
            )));
        }
        if tree.destination().is_some() {
            return Err(TreeError::InvariantViolated(
                "a destination marker already exists".to_string(),
            ));
        }
        let parent = tree
            .parent(self.widget)
            .ok_or(TreeError::NodeNotFound(self.widget))?;

        let index = tree.index_of(parent, self.widget)?;
        let marker = tree.create_node(NodeKind::Destination, self.marker_style.clone());
        tree.replace(parent, index, marker)?;
        self.destination = Some(marker);
        tree.finish_edit();

        tracing::debug!(
            "Detached {:?} from {:?}[{}], destination {:?}",
            self.widget,
            parent,
            index,
            marker
        );
        Ok(())
    }
}

/// How [`PlaceDestinationOperation`] changed the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Hovered node was wrapped in a new horizontal container next to the marker.
    Split { container: NodeId },
    /// Marker moved to the hovered node's position in its container.
    Reorder { parent: NodeId, index: usize },
    /// Nothing to do for this hover.
    Unchanged,
}

/// Move the destination marker relative to a hovered node.
#[derive(Debug)]
pub struct PlaceDestinationOperation {
    pub destination: NodeId,
    pub hovered: NodeId,
    pub zone: DropZone,
    /// Style given to a box created by a split.
    pub box_style: NodeStyle,
    placement: Placement,
}

impl PlaceDestinationOperation {
    pub fn new(destination: NodeId, hovered: NodeId, zone: DropZone, box_style: NodeStyle) -> Self {
        Self {
            destination,
            hovered,
            zone,
            box_style,
            placement: Placement::Unchanged,
        }
    }

    /// Outcome of the last [`execute`](EditOperation::execute).
    pub fn placement(&self) -> Placement {
        self.placement
    }

    fn split(&mut self, tree: &mut LayoutTree, old_parent: NodeId) -> TreeResult<Placement> {
        tree.remove(old_parent, self.destination)?;

        let parent = tree
            .parent(self.hovered)
            .ok_or(TreeError::NodeNotFound(self.hovered))?;
        let index = tree.index_of(parent, self.hovered)?;
        let container = tree.wrap(parent, self.hovered, index, self.box_style.clone())?;
        tree.insert(container, self.destination, self.zone.split_index())?;

        tree.collapse_if_singleton(old_parent)?;
        Ok(Placement::Split { container })
    }

    fn reorder(&mut self, tree: &mut LayoutTree, old_parent: NodeId) -> TreeResult<Placement> {
        let parent = tree
            .parent(self.hovered)
            .ok_or(TreeError::NodeNotFound(self.hovered))?;
        // Taken before the marker leaves: moving within one container swaps the two.
        let index = tree.index_of(parent, self.hovered)?;

        tree.remove(old_parent, self.destination)?;
        let index = index.min(tree.children(parent).len());
        tree.insert(parent, self.destination, index)?;

        if old_parent != parent {
            tree.collapse_if_singleton(old_parent)?;
        }
        Ok(Placement::Reorder { parent, index })
    }
}

impl EditOperation for PlaceDestinationOperation {
    fn execute(&mut self, tree: &mut LayoutTree) -> TreeResult<()> {
        profile_function!();

        self.placement = Placement::Unchanged;

        if !tree.node(self.destination)?.kind.is_destination() {
            return Err(TreeError::InvariantViolated(format!(
                "{:?} is not the destination marker",
                self.destination
            )));
        }
        let old_parent = tree
            .parent(self.destination)
            .ok_or(TreeError::NodeNotFound(self.destination))?;

        if self.hovered == self.destination
            || self.hovered == tree.root()
            || !matches!(tree.node(self.hovered)?.kind, NodeKind::Leaf(_))
            || !tree.is_attached(self.hovered)?
        {
            return Ok(());
        }
        let Some(parent) = tree.parent(self.hovered) else {
            return Ok(());
        };
        let parent_is_row = tree
            .node(parent)?
            .kind
            .orientation()
            .is_some_and(|o| o.is_horizontal());

        self.placement = if self.zone.is_horizontal() && !parent_is_row {
            self.split(tree, old_parent)?
        } else {
            self.reorder(tree, old_parent)?
        };
        tree.finish_edit();

        tracing::debug!(
            "Destination {:?} placed by {:?} on {:?}: {:?}",
            self.destination,
            self.zone,
            self.hovered,
            self.placement
        );
        Ok(())
    }
}

/// Put a floating widget where the destination marker is and drop the marker.
#[derive(Debug)]
pub struct CommitOperation {
    pub destination: NodeId,
    pub widget: NodeId,
    /// Where the widget landed.
    landed: Option<(NodeId, usize)>,
}

impl CommitOperation {
    pub fn new(destination: NodeId, widget: NodeId) -> Self {
        Self {
            destination,
            widget,
            landed: None,
        }
    }

    /// Parent and index the widget was placed at.
    pub fn landed(&self) -> Option<(NodeId, usize)> {
        self.landed
    }
}

impl EditOperation for CommitOperation {
    fn execute(&mut self, tree: &mut LayoutTree) -> TreeResult<()> {
        profile_function!();

        if !tree.node(self.destination)?.kind.is_destination() {
            return Err(TreeError::InvariantViolated(format!(
                "{:?} is not the destination marker",
                self.destination
            )));
        }
        if tree.node(self.widget)?.parent().is_some() {
            return Err(TreeError::AlreadyAttached(self.widget));
        }
        let parent = tree
            .parent(self.destination)
            .ok_or(TreeError::NodeNotFound(self.destination))?;
        let index = tree.index_of(parent, self.destination)?;

        tree.replace(parent, index, self.widget)?;
        tree.discard(self.destination)?;
        self.landed = Some((parent, index));
        tree.finish_edit();

        tracing::debug!("Committed {:?} at {:?}[{}]", self.widget, parent, index);
        Ok(())
    }
}

/// Build the style of a box created by a split.
pub fn split_box_style(widget_style: &NodeStyle, spacing: f32) -> NodeStyle {
    NodeStyle {
        height: widget_style.height,
        size_hint: widget_style.size_hint,
        spacing: Some(crate::tree::Spacing::Uniform(spacing)),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::Widget;
    use formcraft_core::config::{Orientation, SizeHint};

    fn widget_style() -> NodeStyle {
        NodeStyle::sized(40.0, SizeHint::new(Some(1.0), None))
    }

    fn setup(orientation: Orientation, count: usize) -> (LayoutTree, Vec<NodeId>) {
        let mut tree = LayoutTree::new(orientation, NodeStyle::default());
        let root = tree.root();
        let ids = (0..count)
            .map(|i| {
                let id = tree.create_leaf(Widget::label(format!("Label {}", i + 1)), widget_style());
                tree.push(root, id).unwrap();
                id
            })
            .collect();
        (tree, ids)
    }

    fn detach(tree: &mut LayoutTree, widget: NodeId) -> NodeId {
        let mut op = DetachOperation::new(widget, widget_style());
        op.execute(tree).unwrap();
        op.destination().unwrap()
    }

    fn place(tree: &mut LayoutTree, dest: NodeId, hovered: NodeId, zone: DropZone) -> Placement {
        let mut op = PlaceDestinationOperation::new(
            dest,
            hovered,
            zone,
            split_box_style(&widget_style(), 10.0),
        );
        op.execute(tree).unwrap();
        op.placement()
    }

    #[test]
    fn test_detach_leaves_marker_in_slot() {
        let (mut tree, ids) = setup(Orientation::Flow, 3);
        let root = tree.root();

        let dest = detach(&mut tree, ids[1]);

        assert_eq!(tree.children(root), &[ids[0], dest, ids[2]]);
        assert_eq!(tree.parent(ids[1]), None);
        assert_eq!(tree.destination_count(), 1);
    }

    #[test]
    fn test_detach_twice_fails() {
        let (mut tree, ids) = setup(Orientation::Flow, 2);
        detach(&mut tree, ids[0]);
        let mut op = DetachOperation::new(ids[1], widget_style());
        assert!(matches!(
            op.execute(&mut tree),
            Err(TreeError::InvariantViolated(_))
        ));
    }

    #[test]
    fn test_detach_container_fails() {
        let (mut tree, _) = setup(Orientation::Flow, 1);
        let root = tree.root();
        let mut op = DetachOperation::new(root, widget_style());
        assert!(op.execute(&mut tree).is_err());
    }

    #[test]
    fn test_split_left_in_vertical_root() {
        let (mut tree, ids) = setup(Orientation::Vertical, 2);
        let root = tree.root();
        let dest = detach(&mut tree, ids[1]);

        let placement = place(&mut tree, dest, ids[0], DropZone::Left);

        let Placement::Split { container } = placement else {
            panic!("expected split, got {:?}", placement);
        };
        assert_eq!(tree.children(root), &[container]);
        assert_eq!(tree.children(container), &[dest, ids[0]]);
        assert_eq!(
            tree.get(container).unwrap().kind,
            NodeKind::Container(Orientation::Horizontal)
        );
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_split_right_puts_marker_second() {
        let (mut tree, ids) = setup(Orientation::Flow, 2);
        let dest = detach(&mut tree, ids[1]);

        let Placement::Split { container } = place(&mut tree, dest, ids[0], DropZone::Right) else {
            panic!("expected split");
        };
        assert_eq!(tree.children(container), &[ids[0], dest]);
    }

    #[test]
    fn test_split_box_inherits_widget_sizing() {
        let (mut tree, ids) = setup(Orientation::Flow, 2);
        let dest = detach(&mut tree, ids[1]);
        let Placement::Split { container } = place(&mut tree, dest, ids[0], DropZone::Left) else {
            panic!("expected split");
        };
        let style = &tree.get(container).unwrap().style;
        assert_eq!(style.height, Some(40.0));
        assert_eq!(style.spacing, Some(crate::tree::Spacing::Uniform(10.0)));
    }

    #[test]
    fn test_reorder_in_horizontal_root() {
        let (mut tree, ids) = setup(Orientation::Horizontal, 2);
        let root = tree.root();
        let dest = detach(&mut tree, ids[1]);

        let placement = place(&mut tree, dest, ids[0], DropZone::Left);

        assert_eq!(placement, Placement::Reorder { parent: root, index: 0 });
        assert_eq!(tree.children(root), &[dest, ids[0]]);
    }

    #[test]
    fn test_reorder_within_container_swaps() {
        let (mut tree, ids) = setup(Orientation::Flow, 3);
        let root = tree.root();
        let dest = detach(&mut tree, ids[0]);

        place(&mut tree, dest, ids[2], DropZone::Bottom);
        assert_eq!(tree.children(root), &[ids[1], ids[2], dest]);

        place(&mut tree, dest, ids[1], DropZone::Top);
        assert_eq!(tree.children(root), &[dest, ids[1], ids[2]]);
    }

    #[test]
    fn test_leaving_a_box_collapses_it() {
        let (mut tree, ids) = setup(Orientation::Flow, 3);
        let root = tree.root();
        let dest = detach(&mut tree, ids[2]);
        let Placement::Split { container } = place(&mut tree, dest, ids[0], DropZone::Right) else {
            panic!("expected split");
        };
        assert_eq!(tree.children(root), &[container, ids[1]]);

        place(&mut tree, dest, ids[1], DropZone::Top);

        assert!(!tree.contains(container));
        assert_eq!(tree.children(root), &[ids[0], dest, ids[1]]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_split_out_of_a_box_collapses_old_box() {
        let (mut tree, ids) = setup(Orientation::Flow, 3);
        let root = tree.root();
        let dest = detach(&mut tree, ids[2]);
        let Placement::Split { container: first } = place(&mut tree, dest, ids[0], DropZone::Left)
        else {
            panic!("expected split");
        };

        let Placement::Split { container: second } = place(&mut tree, dest, ids[1], DropZone::Right)
        else {
            panic!("expected split");
        };

        assert!(!tree.contains(first));
        assert_eq!(tree.children(root), &[ids[0], second]);
        assert_eq!(tree.children(second), &[ids[1], dest]);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_hovering_marker_is_noop() {
        let (mut tree, ids) = setup(Orientation::Flow, 2);
        let dest = detach(&mut tree, ids[0]);
        let generation = tree.generation();

        assert_eq!(place(&mut tree, dest, dest, DropZone::Right), Placement::Unchanged);
        assert_eq!(tree.generation(), generation);
    }

    #[test]
    fn test_hovering_detached_widget_is_noop() {
        let (mut tree, ids) = setup(Orientation::Flow, 1);
        let root = tree.root();
        let dest = detach(&mut tree, ids[0]);

        assert_eq!(place(&mut tree, dest, ids[0], DropZone::Right), Placement::Unchanged);
        assert_eq!(tree.children(root), &[dest]);
    }

    #[test]
    fn test_commit_replaces_marker() {
        let (mut tree, ids) = setup(Orientation::Vertical, 2);
        let root = tree.root();
        let dest = detach(&mut tree, ids[1]);
        let Placement::Split { container } = place(&mut tree, dest, ids[0], DropZone::Left) else {
            panic!("expected split");
        };

        let mut commit = CommitOperation::new(dest, ids[1]);
        commit.execute(&mut tree).unwrap();

        assert_eq!(commit.landed(), Some((container, 0)));
        assert_eq!(tree.children(root), &[container]);
        assert_eq!(tree.children(container), &[ids[1], ids[0]]);
        assert!(!tree.contains(dest));
        assert_eq!(tree.destination_count(), 0);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_commit_with_attached_widget_fails() {
        let (mut tree, ids) = setup(Orientation::Flow, 2);
        let dest = detach(&mut tree, ids[1]);
        let mut commit = CommitOperation::new(dest, ids[0]);
        assert!(commit.execute(&mut tree).is_err());
    }
}
