//! Formcraft UI - drag-and-drop form layout editing
//!
//! This crate provides the layout-tree engine behind a form builder:
//! - An arena tree of nested horizontal/vertical containers holding widgets
//! - A drag session that moves a live destination marker while the pointer moves
//! - Split, reorder and collapse edits driven by the pointer's drop zone
//! - A taffy-based reference layout for hit-testing
//! - Export of the finished layout as kv text
//!
//! ## Quick Start
//!
//! ```rust
//! # use formcraft_ui::{FormCanvas, Widget};
//! # use formcraft_core::{config::CanvasConfig, geometry::Size, math::Vec2};
//! let mut canvas = FormCanvas::new(CanvasConfig::default());
//! canvas.set_viewport(Size::new(800.0, 600.0)).unwrap();
//!
//! let button = canvas.add_widget(Widget::button("OK")).unwrap();
//! let label = canvas.add_widget(Widget::label("Name")).unwrap();
//!
//! // Drag the button onto the right half of the label.
//! let from = canvas.bounds(button).unwrap().center();
//! let over = canvas.bounds(label).unwrap();
//! let to = over.position() + over.size().as_vec2() * Vec2::new(0.9, 0.5);
//! canvas.pointer_down(from).unwrap();
//! canvas.pointer_move(to).unwrap();
//! canvas.pointer_up(to).unwrap();
//!
//! println!("{}", canvas.export_layout());
//! ```

pub mod canvas;
pub mod dirty;
pub mod drag;
pub mod editor;
pub mod error;
pub mod export;
pub mod layout;
pub mod tree;
pub mod widget;
pub mod zone;

pub use dirty::DirtyFlags;
pub use error::{DragError, DragResult, TreeError, TreeResult};
pub use widget::{Widget, WidgetKind};

// Re-export main types
pub use canvas::FormCanvas;
pub use drag::{DragManager, DragOverlay, DragPhase, DragSession, DragStyle};
pub use editor::{
    CommitOperation, DetachOperation, EditOperation, PlaceDestinationOperation, Placement,
};
pub use export::{KvDocument, export};
pub use layout::LayoutEngine;
pub use tree::{LayoutNode, LayoutRect, LayoutTree, NodeId, NodeKind, NodeStyle, Spacing};
pub use zone::{DropZone, detect_zone};
