//! Drag session: picking a widget up, hovering it over the form, and dropping it.
//!
//! A session goes `Detached -> Hovering* -> Attached | Cancelled`. "Idle" is the
//! absence of a session in the [`DragManager`]. The destination marker exists for
//! exactly as long as the session is in `Detached` or `Hovering`.

use formcraft_core::config::{CanvasConfig, SizeHint};
use formcraft_core::geometry::Size;
use formcraft_core::math::Vec2;

use crate::editor::{
    CommitOperation, DetachOperation, EditOperation, PlaceDestinationOperation, Placement,
    split_box_style,
};
use crate::error::{DragError, DragResult};
use crate::tree::{LayoutRect, LayoutTree, NodeId, NodeKind, NodeStyle};
use crate::zone::{DropZone, detect_zone};

/// Phase of a drag session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Widget picked up, no hover processed yet.
    Detached,
    /// At least one hover was processed.
    Hovering,
    /// Widget dropped at the destination.
    Attached,
    /// Widget put back at the destination without a drop.
    Cancelled,
}

impl DragPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, DragPhase::Detached | DragPhase::Hovering)
    }
}

/// Styles applied to nodes touched by a drag.
#[derive(Debug, Clone)]
pub struct DragStyle {
    /// Style a widget gets back when it lands.
    pub widget: NodeStyle,
    /// Style of the destination marker.
    pub marker: NodeStyle,
    /// Style of a box created by a split.
    pub split_box: NodeStyle,
}

impl DragStyle {
    pub fn from_config(config: &CanvasConfig) -> Self {
        let widget = NodeStyle::sized(config.widget_height, config.widget_size_hint);
        Self {
            marker: widget.clone(),
            split_box: split_box_style(&widget, config.spacing[0]),
            widget,
        }
    }
}

/// The free-floating layer a dragged widget lives in while it is off the tree.
#[derive(Debug, Clone)]
pub struct DragOverlay {
    size: Size<f32>,
    pointer: Vec2,
    widget: Option<NodeId>,
}

impl DragOverlay {
    pub fn new(size: Size<f32>) -> Self {
        Self {
            size,
            pointer: Vec2::ZERO,
            widget: None,
        }
    }

    pub fn from_config(config: &CanvasConfig) -> Self {
        Self::new(Size::new(config.overlay_width, config.overlay_height))
    }

    /// The widget currently floating, if any.
    pub fn widget(&self) -> Option<NodeId> {
        self.widget
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn size(&self) -> Size<f32> {
        self.size
    }

    /// Follow the pointer; the widget is centred on it.
    pub fn move_to(&mut self, pointer: Vec2) {
        self.pointer = pointer;
    }

    /// Where the floating widget is drawn.
    pub fn bounds(&self) -> LayoutRect {
        let origin = self.pointer - self.size.as_vec2() / 2.0;
        LayoutRect::new(origin.x, origin.y, self.size.width, self.size.height)
    }

    /// Style a widget gets while it floats.
    pub fn floating_style(&self) -> NodeStyle {
        NodeStyle {
            width: Some(self.size.width),
            height: Some(self.size.height),
            size_hint: SizeHint::NONE,
            ..Default::default()
        }
    }

    fn hold(&mut self, widget: NodeId, pointer: Vec2) {
        self.widget = Some(widget);
        self.pointer = pointer;
    }

    fn release(&mut self) -> Option<NodeId> {
        self.widget.take()
    }
}

/// One widget being dragged.
#[derive(Debug)]
pub struct DragSession {
    overlay: DragOverlay,
    widget: NodeId,
    destination: NodeId,
    phase: DragPhase,
    style: DragStyle,
    last_zone: Option<DropZone>,
}

impl DragSession {
    /// Pick `widget` up: its slot gets a destination marker and the widget moves
    /// into `overlay` at `pointer`.
    pub fn detach(
        tree: &mut LayoutTree,
        widget: NodeId,
        pointer: Vec2,
        mut overlay: DragOverlay,
        style: DragStyle,
    ) -> DragResult<Self> {
        let node = tree.node(widget)?;
        if !matches!(node.kind, NodeKind::Leaf(_)) || !tree.is_attached(widget)? {
            return Err(DragError::NotDraggable(widget));
        }

        let mut op = DetachOperation::new(widget, style.marker.clone());
        op.execute(tree)?;
        let destination = op.destination().ok_or(DragError::MissingDestination)?;

        *tree.style_mut(widget)? = overlay.floating_style();
        overlay.hold(widget, pointer);

        tracing::debug!("Drag started for {:?} at {:?}", widget, pointer);
        Ok(Self {
            overlay,
            widget,
            destination,
            phase: DragPhase::Detached,
            style,
            last_zone: None,
        })
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn widget(&self) -> NodeId {
        self.widget
    }

    pub fn destination(&self) -> NodeId {
        self.destination
    }

    pub fn overlay(&self) -> &DragOverlay {
        &self.overlay
    }

    /// Zone computed by the last processed hover.
    pub fn last_zone(&self) -> Option<DropZone> {
        self.last_zone
    }

    /// Parent of the destination marker.
    pub fn destination_parent(&self, tree: &LayoutTree) -> Option<NodeId> {
        tree.parent(self.destination)
    }

    pub fn move_overlay(&mut self, pointer: Vec2) {
        self.overlay.move_to(pointer);
    }

    /// Move the destination marker according to where `pointer` is on `hovered`.
    pub fn point(
        &mut self,
        tree: &mut LayoutTree,
        hovered: NodeId,
        hovered_bounds: LayoutRect,
        pointer: Vec2,
    ) -> DragResult<Placement> {
        self.ensure_active()?;
        self.ensure_destination(tree)?;

        let zone = detect_zone(hovered_bounds, pointer);
        let mut op =
            PlaceDestinationOperation::new(self.destination, hovered, zone, self.style.split_box.clone());
        op.execute(tree)?;

        self.phase = DragPhase::Hovering;
        self.last_zone = Some(zone);
        Ok(op.placement())
    }

    /// Drop the widget where the destination marker is.
    pub fn attach(&mut self, tree: &mut LayoutTree) -> DragResult<(NodeId, usize)> {
        let landed = self.put_back(tree)?;
        self.phase = DragPhase::Attached;
        tracing::debug!("Drag of {:?} attached at {:?}", self.widget, landed);
        Ok(landed)
    }

    /// End the drag without a drop; the widget lands on the destination marker.
    pub fn cancel(&mut self, tree: &mut LayoutTree) -> DragResult<(NodeId, usize)> {
        let landed = self.put_back(tree)?;
        self.phase = DragPhase::Cancelled;
        tracing::debug!("Drag of {:?} cancelled, restored at {:?}", self.widget, landed);
        Ok(landed)
    }

    fn put_back(&mut self, tree: &mut LayoutTree) -> DragResult<(NodeId, usize)> {
        self.ensure_active()?;
        self.ensure_destination(tree)?;

        let widget = self.overlay.widget().ok_or(DragError::NotDragging)?;
        *tree.style_mut(widget)? = self.style.widget.clone();

        let mut op = CommitOperation::new(self.destination, widget);
        op.execute(tree)?;
        self.overlay.release();
        op.landed().ok_or(DragError::MissingDestination)
    }

    fn ensure_active(&self) -> DragResult<()> {
        if self.phase.is_active() {
            Ok(())
        } else {
            Err(DragError::NotDragging)
        }
    }

    fn ensure_destination(&self, tree: &LayoutTree) -> DragResult<()> {
        let present = tree
            .get(self.destination)
            .is_some_and(|n| n.kind.is_destination())
            && tree.is_attached(self.destination)?;
        if present {
            Ok(())
        } else {
            Err(DragError::MissingDestination)
        }
    }
}

/// Holds the single active drag, if any.
#[derive(Debug, Default)]
pub struct DragManager {
    session: Option<DragSession>,
}

impl DragManager {
    pub fn new() -> Self {
        Self { session: None }
    }

    /// Check if there's an active drag operation.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut DragSession> {
        self.session.as_mut()
    }

    /// Start a drag. Fails while another drag is active.
    pub fn begin(
        &mut self,
        tree: &mut LayoutTree,
        widget: NodeId,
        pointer: Vec2,
        overlay: DragOverlay,
        style: DragStyle,
    ) -> DragResult<&mut DragSession> {
        if self.session.is_some() {
            return Err(DragError::AlreadyDragging);
        }
        let session = DragSession::detach(tree, widget, pointer, overlay, style)?;
        Ok(self.session.insert(session))
    }

    pub fn point(
        &mut self,
        tree: &mut LayoutTree,
        hovered: NodeId,
        hovered_bounds: LayoutRect,
        pointer: Vec2,
    ) -> DragResult<Placement> {
        let session = self.session.as_mut().ok_or(DragError::NotDragging)?;
        session.point(tree, hovered, hovered_bounds, pointer)
    }

    /// Finish the drag with a drop. The session ends only if the drop succeeds.
    pub fn attach(&mut self, tree: &mut LayoutTree) -> DragResult<(NodeId, usize)> {
        let session = self.session.as_mut().ok_or(DragError::NotDragging)?;
        let landed = session.attach(tree)?;
        self.session = None;
        Ok(landed)
    }

    /// Finish the drag without a drop. The session ends only if the widget was put back.
    pub fn cancel(&mut self, tree: &mut LayoutTree) -> DragResult<(NodeId, usize)> {
        let session = self.session.as_mut().ok_or(DragError::NotDragging)?;
        let landed = session.cancel(tree)?;
        self.session = None;
        Ok(landed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::Widget;
    use formcraft_core::config::Orientation;

    fn setup(orientation: Orientation) -> (LayoutTree, CanvasConfig, NodeId, NodeId) {
        let config = CanvasConfig::default().with_root_orientation(orientation);
        let style = DragStyle::from_config(&config);
        let mut tree = LayoutTree::new(orientation, NodeStyle::default());
        let root = tree.root();
        let a = tree.create_leaf(Widget::button("A"), style.widget.clone());
        let b = tree.create_leaf(Widget::button("B"), style.widget.clone());
        tree.push(root, a).unwrap();
        tree.push(root, b).unwrap();
        (tree, config, a, b)
    }

    fn row(x: f32) -> LayoutRect {
        LayoutRect::new(x, 0.0, 100.0, 40.0)
    }

    #[test]
    fn test_detach_floats_widget() {
        let (mut tree, config, a, _) = setup(Orientation::Flow);
        let mut manager = DragManager::new();

        let session = manager
            .begin(
                &mut tree,
                a,
                Vec2::new(50.0, 20.0),
                DragOverlay::from_config(&config),
                DragStyle::from_config(&config),
            )
            .unwrap();

        assert_eq!(session.phase(), DragPhase::Detached);
        assert_eq!(session.overlay().widget(), Some(a));
        assert_eq!(session.overlay().bounds(), LayoutRect::new(-25.0, -5.0, 150.0, 50.0));
        assert_eq!(tree.get(a).unwrap().style.size_hint, SizeHint::NONE);
        assert_eq!(tree.destination_count(), 1);
        assert!(manager.is_dragging());
    }

    #[test]
    fn test_second_drag_is_rejected() {
        let (mut tree, config, a, b) = setup(Orientation::Flow);
        let mut manager = DragManager::new();
        let overlay = DragOverlay::from_config(&config);
        let style = DragStyle::from_config(&config);
        manager
            .begin(&mut tree, a, Vec2::ZERO, overlay.clone(), style.clone())
            .unwrap();

        let err = manager.begin(&mut tree, b, Vec2::ZERO, overlay, style).unwrap_err();
        assert_eq!(err, DragError::AlreadyDragging);
        assert_eq!(tree.destination_count(), 1);
    }

    #[test]
    fn test_point_then_attach() {
        let (mut tree, config, a, b) = setup(Orientation::Vertical);
        let root = tree.root();
        let mut manager = DragManager::new();
        manager
            .begin(
                &mut tree,
                b,
                Vec2::ZERO,
                DragOverlay::from_config(&config),
                DragStyle::from_config(&config),
            )
            .unwrap();

        let placement = manager
            .point(&mut tree, a, row(0.0), Vec2::new(10.0, 20.0))
            .unwrap();
        let Placement::Split { container } = placement else {
            panic!("expected split, got {:?}", placement);
        };
        assert_eq!(manager.session().unwrap().phase(), DragPhase::Hovering);
        assert_eq!(manager.session().unwrap().last_zone(), Some(DropZone::Left));

        let landed = manager.attach(&mut tree).unwrap();

        assert_eq!(landed, (container, 0));
        assert_eq!(tree.children(root), &[container]);
        assert_eq!(tree.children(container), &[b, a]);
        assert_eq!(tree.get(b).unwrap().style.height, Some(40.0));
        assert_eq!(tree.destination_count(), 0);
        assert!(!manager.is_dragging());
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_cancel_restores_at_marker() {
        let (mut tree, config, a, b) = setup(Orientation::Flow);
        let root = tree.root();
        let mut manager = DragManager::new();
        manager
            .begin(
                &mut tree,
                a,
                Vec2::ZERO,
                DragOverlay::from_config(&config),
                DragStyle::from_config(&config),
            )
            .unwrap();
        manager
            .point(&mut tree, b, row(0.0), Vec2::new(50.0, 10.0))
            .unwrap();

        manager.cancel(&mut tree).unwrap();

        assert_eq!(tree.children(root), &[b, a]);
        assert!(!manager.is_dragging());
    }

    #[test]
    fn test_missing_destination_keeps_session() {
        let (mut tree, config, a, _) = setup(Orientation::Flow);
        let root = tree.root();
        let mut manager = DragManager::new();
        let destination = manager
            .begin(
                &mut tree,
                a,
                Vec2::ZERO,
                DragOverlay::from_config(&config),
                DragStyle::from_config(&config),
            )
            .unwrap()
            .destination();

        tree.remove(root, destination).unwrap();

        assert_eq!(manager.attach(&mut tree), Err(DragError::MissingDestination));
        assert!(manager.is_dragging());
        assert_eq!(
            manager.session().unwrap().overlay().widget(),
            Some(a),
            "widget must not be dropped"
        );
    }

    #[test]
    fn test_operations_without_session_fail() {
        let (mut tree, _, a, _) = setup(Orientation::Flow);
        let mut manager = DragManager::new();
        assert_eq!(manager.attach(&mut tree), Err(DragError::NotDragging));
        assert_eq!(manager.cancel(&mut tree), Err(DragError::NotDragging));
        assert_eq!(
            manager.point(&mut tree, a, row(0.0), Vec2::ZERO),
            Err(DragError::NotDragging)
        );
    }

    #[test]
    fn test_detach_root_is_rejected() {
        let (mut tree, config, _, _) = setup(Orientation::Flow);
        let root = tree.root();
        let err = DragSession::detach(
            &mut tree,
            root,
            Vec2::ZERO,
            DragOverlay::from_config(&config),
            DragStyle::from_config(&config),
        )
        .unwrap_err();
        assert_eq!(err, DragError::NotDraggable(root));
    }
}
