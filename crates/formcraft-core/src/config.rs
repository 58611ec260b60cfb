/// Axis along which a container lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Left-to-right, wrapping top-to-bottom ("lr-tb" stacking).
    #[default]
    Flow,
    /// A single row.
    Horizontal,
    /// A single column.
    Vertical,
}

impl Orientation {
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Orientation::Horizontal)
    }

    /// Name used in exported layouts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Flow => "lr-tb",
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }
}

/// Relative size of a node along each axis. `None` means the fixed size is used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeHint {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl SizeHint {
    pub const NONE: SizeHint = SizeHint {
        width: None,
        height: None,
    };

    pub fn new(width: Option<f32>, height: Option<f32>) -> Self {
        Self { width, height }
    }
}

impl Default for SizeHint {
    fn default() -> Self {
        Self {
            width: Some(1.0),
            height: Some(1.0),
        }
    }
}

/// Configuration for a form canvas.
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    /// Orientation of the root container.
    pub root_orientation: Orientation,
    /// Height given to every placed widget and every split box.
    pub widget_height: f32,
    /// Size hint given to every placed widget and every split box.
    pub widget_size_hint: SizeHint,
    /// Root padding as `[left, top, right, bottom]`.
    pub padding: [f32; 4],
    /// Root spacing as `[horizontal, vertical]`. Split boxes use the horizontal value.
    pub spacing: [f32; 2],
    /// Size of a widget while it floats under the pointer.
    pub overlay_width: f32,
    pub overlay_height: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            root_orientation: Orientation::Flow,
            widget_height: 40.0,
            widget_size_hint: SizeHint::new(Some(1.0), None),
            padding: [10.0, 10.0, 10.0, 10.0],
            spacing: [10.0, 10.0],
            overlay_width: 150.0,
            overlay_height: 50.0,
        }
    }
}

impl CanvasConfig {
    pub fn with_root_orientation(mut self, orientation: Orientation) -> Self {
        self.root_orientation = orientation;
        self
    }

    pub fn with_widget_height(mut self, height: f32) -> Self {
        self.widget_height = height;
        self
    }
}
