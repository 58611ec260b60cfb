//! The form canvas: a layout tree plus the pointer handling that edits it.
//!
//! Hosts feed pointer events in viewport coordinates (y-up). The canvas keeps its
//! reference layout current after every edit so each event is hit-tested against
//! the tree as it looks right now.

use formcraft_core::config::CanvasConfig;
use formcraft_core::geometry::Size;
use formcraft_core::math::Vec2;
use formcraft_core::profiling::profile_function;

use crate::drag::{DragManager, DragOverlay, DragSession, DragStyle};
use crate::error::{DragError, DragResult, TreeResult};
use crate::export::export;
use crate::layout::LayoutEngine;
use crate::tree::{LayoutRect, LayoutTree, NodeId, NodeKind, NodeStyle, Spacing};
use crate::widget::Widget;

pub struct FormCanvas {
    config: CanvasConfig,
    tree: LayoutTree,
    layout: LayoutEngine,
    drag: DragManager,
    viewport: Option<Size<f32>>,
}

impl Default for FormCanvas {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl FormCanvas {
    pub fn new(config: CanvasConfig) -> Self {
        let root_style = NodeStyle::default()
            .with_padding(config.padding)
            .with_spacing(Spacing::Axes(config.spacing));
        let tree = LayoutTree::new(config.root_orientation, root_style);
        tracing::debug!(
            "Created form canvas with {:?} root",
            config.root_orientation
        );
        Self {
            config,
            tree,
            layout: LayoutEngine::new(),
            drag: DragManager::new(),
            viewport: None,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Read-only access to the layout tree.
    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    /// Bounds of an attached node from the last layout pass.
    pub fn bounds(&self, node_id: NodeId) -> Option<LayoutRect> {
        self.layout.bounds(node_id)
    }

    /// Style placed widgets get.
    pub fn widget_style(&self) -> NodeStyle {
        NodeStyle::sized(self.config.widget_height, self.config.widget_size_hint)
    }

    /// Append a widget to the root.
    pub fn add_widget(&mut self, widget: Widget) -> TreeResult<NodeId> {
        let root = self.tree.root();
        let id = self.tree.create_leaf(widget, self.widget_style());
        self.tree.push(root, id)?;
        self.tree.finish_edit();
        self.relayout()?;
        Ok(id)
    }

    /// Change a placed widget's text.
    pub fn set_text(&mut self, node_id: NodeId, text: impl Into<String>) -> TreeResult<bool> {
        let changed = self.tree.set_text(node_id, text)?;
        if changed {
            self.relayout()?;
        }
        Ok(changed)
    }

    pub fn viewport(&self) -> Option<Size<f32>> {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size<f32>) -> TreeResult<()> {
        self.viewport = Some(viewport);
        self.relayout()?;
        Ok(())
    }

    /// Recompute bounds if a viewport is known and anything changed.
    pub fn relayout(&mut self) -> TreeResult<bool> {
        match self.viewport {
            Some(viewport) => self.layout.compute(&mut self.tree, viewport),
            None => Ok(false),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.session()
    }

    /// The floating widget layer while a drag is active.
    pub fn drag_overlay(&self) -> Option<&DragOverlay> {
        self.drag.session().map(DragSession::overlay)
    }

    /// Pick up the widget under `pos`.
    ///
    /// Returns `Ok(false)` if nothing was picked up: a drag already holds the
    /// pointer or no widget is under it.
    pub fn pointer_down(&mut self, pos: Vec2) -> DragResult<bool> {
        profile_function!();

        if self.drag.is_dragging() {
            return Ok(false);
        }
        let Some(widget) = self.widget_at(pos) else {
            return Ok(false);
        };

        self.drag.begin(
            &mut self.tree,
            widget,
            pos,
            DragOverlay::from_config(&self.config),
            DragStyle::from_config(&self.config),
        )?;
        self.relayout()?;
        Ok(true)
    }

    /// Follow the pointer and move the destination marker to match the node under it.
    pub fn pointer_move(&mut self, pos: Vec2) -> DragResult<()> {
        profile_function!();

        let session = self.drag.session_mut().ok_or(DragError::NotDragging)?;
        session.move_overlay(pos);

        let hovered = self
            .layout
            .node_at(&self.tree, pos)
            .and_then(|id| self.layout.bounds(id).map(|bounds| (id, bounds)));
        if let Some((id, bounds)) = hovered {
            self.drag.point(&mut self.tree, id, bounds, pos)?;
            self.relayout()?;
        }
        Ok(())
    }

    /// Drop the dragged widget. Returns `Ok(None)` if no drag was active.
    ///
    /// Releasing outside the canvas fails with [`DragError::NoCanvasUnderPointer`]
    /// and keeps the drag alive; the host decides whether to cancel it.
    pub fn pointer_up(&mut self, pos: Vec2) -> DragResult<Option<NodeId>> {
        profile_function!();

        let Some(session) = self.drag.session() else {
            return Ok(None);
        };
        let widget = session.widget();
        if !self.layout.contains(&self.tree, pos) {
            tracing::warn!("Pointer released outside the form canvas at {:?}", pos);
            return Err(DragError::NoCanvasUnderPointer { pos });
        }

        self.drag.attach(&mut self.tree)?;
        self.relayout()?;
        Ok(Some(widget))
    }

    /// Abort the drag and put the widget where the destination marker is.
    pub fn cancel_drag(&mut self) -> DragResult<NodeId> {
        let widget = self
            .drag
            .session()
            .map(DragSession::widget)
            .ok_or(DragError::NotDragging)?;
        self.drag.cancel(&mut self.tree)?;
        self.relayout()?;
        Ok(widget)
    }

    pub fn export_layout(&self) -> String {
        export(&self.tree)
    }

    pub fn validate(&self) -> TreeResult<()> {
        self.tree.validate()
    }

    fn widget_at(&self, pos: Vec2) -> Option<NodeId> {
        self.layout
            .node_at(&self.tree, pos)
            .filter(|&id| matches!(self.tree.get(id).map(|n| &n.kind), Some(NodeKind::Leaf(_))))
    }
}
