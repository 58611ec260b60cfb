//! Reference layout for a [`LayoutTree`], computed with taffy.
//!
//! The flow root is a wrapping row, horizontal boxes are rows and vertical
//! containers are columns. A size hint on the parent's main axis becomes flex
//! grow; on the cross axis (and everywhere inside a flow root) it is a fraction
//! of the parent's content box. Computed bounds are absolute and y-up: the
//! origin is the bottom-left corner of the viewport.

use formcraft_core::alloc::HashMap;
use formcraft_core::config::Orientation;
use formcraft_core::geometry::Size;
use formcraft_core::math::Vec2;
use formcraft_core::profiling::profile_function;
use taffy::TaffyTree;
use taffy::prelude::{
    AlignContent, AlignItems, AvailableSpace, Dimension, Display, FlexDirection, FlexWrap,
    LengthPercentage,
};

use crate::error::{TreeError, TreeResult};
use crate::tree::{LayoutRect, LayoutTree, NodeId, NodeKind, NodeStyle};

fn layout_error(e: taffy::TaffyError) -> TreeError {
    TreeError::Layout(e.to_string())
}

/// Computes and caches node bounds.
pub struct LayoutEngine {
    taffy: TaffyTree<()>,
    bounds: HashMap<NodeId, LayoutRect>,
    viewport: Size<f32>,
    computed: bool,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            taffy: TaffyTree::new(),
            bounds: HashMap::new(),
            viewport: Size::new(0.0, 0.0),
            computed: false,
        }
    }

    pub fn viewport(&self) -> Size<f32> {
        self.viewport
    }

    /// Lay the tree out inside `viewport` unless nothing changed since the last pass.
    ///
    /// Returns `true` if a layout pass ran. Clears the tree's dirty set.
    pub fn compute(&mut self, tree: &mut LayoutTree, viewport: Size<f32>) -> TreeResult<bool> {
        if self.computed && !tree.is_dirty() && viewport == self.viewport {
            return Ok(false);
        }
        self.compute_layout(tree, viewport)?;
        tree.clear_dirty();
        Ok(true)
    }

    fn compute_layout(&mut self, tree: &LayoutTree, viewport: Size<f32>) -> TreeResult<()> {
        profile_function!();

        self.taffy.clear();
        self.bounds.clear();

        let order: Vec<(NodeId, usize)> = tree.walk().collect();
        let mut handles: HashMap<NodeId, taffy::NodeId> = HashMap::new();

        // Reverse pre-order visits every child before its parent.
        for &(id, _) in order.iter().rev() {
            let style = taffy_style(tree, id, viewport)?;
            let handle = if tree.children(id).is_empty() {
                self.taffy.new_leaf(style)
            } else {
                let children: Vec<taffy::NodeId> = tree
                    .children(id)
                    .iter()
                    .filter_map(|child| handles.get(child).copied())
                    .collect();
                self.taffy.new_with_children(style, &children)
            }
            .map_err(layout_error)?;
            handles.insert(id, handle);
        }

        let root = tree.root();
        let root_handle = *handles.get(&root).ok_or(TreeError::NodeNotFound(root))?;
        self.taffy
            .compute_layout(
                root_handle,
                taffy::Size {
                    width: AvailableSpace::Definite(viewport.width),
                    height: AvailableSpace::Definite(viewport.height),
                },
            )
            .map_err(layout_error)?;

        // Taffy locations are relative to the parent and y-down.
        let mut origins: HashMap<NodeId, Vec2> = HashMap::new();
        for &(id, _) in &order {
            let handle = *handles.get(&id).ok_or(TreeError::NodeNotFound(id))?;
            let layout = self.taffy.layout(handle).map_err(layout_error)?;
            let parent_origin = tree
                .parent(id)
                .and_then(|parent| origins.get(&parent).copied())
                .unwrap_or(Vec2::ZERO);
            let origin = parent_origin + Vec2::new(layout.location.x, layout.location.y);
            origins.insert(id, origin);

            let (width, height) = (layout.size.width, layout.size.height);
            self.bounds.insert(
                id,
                LayoutRect::new(origin.x, viewport.height - origin.y - height, width, height),
            );
        }

        self.viewport = viewport;
        self.computed = true;
        tracing::trace!("Laid out {} nodes in {:?}", self.bounds.len(), viewport);
        Ok(())
    }

    /// Bounds of an attached node from the last pass.
    pub fn bounds(&self, node_id: NodeId) -> Option<LayoutRect> {
        self.bounds.get(&node_id).copied()
    }

    /// Whether `pos` lies on the canvas.
    pub fn contains(&self, tree: &LayoutTree, pos: Vec2) -> bool {
        self.bounds(tree.root()).is_some_and(|r| r.contains(pos))
    }

    /// The widget or destination marker under `pos`, if any.
    pub fn node_at(&self, tree: &LayoutTree, pos: Vec2) -> Option<NodeId> {
        tree.walk()
            .filter(|&(id, depth)| {
                depth > 0
                    && tree
                        .get(id)
                        .is_some_and(|n| matches!(n.kind, NodeKind::Leaf(_) | NodeKind::Destination))
            })
            .map(|(id, _)| id)
            .find(|&id| self.bounds(id).is_some_and(|r| r.contains(pos)))
    }
}

fn taffy_style(tree: &LayoutTree, id: NodeId, viewport: Size<f32>) -> TreeResult<taffy::Style> {
    let node = tree.node(id)?;
    let mut style = taffy::Style {
        display: Display::Flex,
        align_items: Some(AlignItems::FlexStart),
        align_content: Some(AlignContent::FlexStart),
        ..Default::default()
    };

    if let NodeKind::Container(orientation) = node.kind {
        style.flex_direction = match orientation {
            Orientation::Vertical => FlexDirection::Column,
            Orientation::Flow | Orientation::Horizontal => FlexDirection::Row,
        };
        if orientation == Orientation::Flow {
            style.flex_wrap = FlexWrap::Wrap;
        }
        if let Some(spacing) = node.style.spacing {
            style.gap = taffy::Size {
                width: LengthPercentage::Length(spacing.horizontal()),
                height: LengthPercentage::Length(spacing.vertical()),
            };
        }
    }
    if let Some([left, top, right, bottom]) = node.style.padding {
        style.padding = taffy::Rect {
            left: LengthPercentage::Length(left),
            right: LengthPercentage::Length(right),
            top: LengthPercentage::Length(top),
            bottom: LengthPercentage::Length(bottom),
        };
    }

    match tree.parent(id) {
        None => {
            style.size = taffy::Size {
                width: Dimension::Length(viewport.width),
                height: Dimension::Length(viewport.height),
            };
        }
        Some(parent) => {
            let parent_orientation = tree
                .node(parent)?
                .kind
                .orientation()
                .ok_or(TreeError::NotAContainer(parent))?;
            apply_child_sizing(&mut style, &node.style, parent_orientation);
        }
    }
    Ok(style)
}

fn apply_child_sizing(style: &mut taffy::Style, node: &NodeStyle, parent: Orientation) {
    style.flex_shrink = 0.0;

    let width = axis_dimension(node.size_hint.width, node.width);
    let height = axis_dimension(node.size_hint.height, node.height);

    let main_hint = match parent {
        Orientation::Horizontal => node.size_hint.width,
        Orientation::Vertical => node.size_hint.height,
        Orientation::Flow => None,
    };
    if let Some(grow) = main_hint {
        style.flex_grow = grow;
        style.flex_shrink = 1.0;
        style.flex_basis = Dimension::Length(0.0);
    }

    style.size = match (parent, main_hint.is_some()) {
        (Orientation::Horizontal, true) => taffy::Size {
            width: Dimension::Auto,
            height,
        },
        (Orientation::Vertical, true) => taffy::Size {
            width,
            height: Dimension::Auto,
        },
        _ => taffy::Size { width, height },
    };
}

/// A hint wins over a fixed size, as long as it is set.
fn axis_dimension(hint: Option<f32>, fixed: Option<f32>) -> Dimension {
    match (hint, fixed) {
        (Some(fraction), _) => Dimension::Percent(fraction),
        (None, Some(length)) => Dimension::Length(length),
        (None, None) => Dimension::Auto,
    }
}
