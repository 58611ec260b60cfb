//! Dirty flags describing what a renderer must refresh after an edit.

use bitflags::bitflags;

bitflags! {
    /// Per-node change flags, cleared by the consumer after it has redrawn.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        const NONE           = 0;

        /// Size or position may have changed.
        const LAYOUT         = 1 << 0;

        /// Children were added, removed, or reordered.
        const CHILDREN_ORDER = 1 << 1;

        /// Height, size hint, spacing or padding changed.
        const STYLE          = 1 << 2;

        /// Widget text changed.
        const TEXT           = 1 << 3;
    }
}

impl DirtyFlags {
    /// Flags set on a container whose child list was edited.
    pub const STRUCTURE: Self = Self::LAYOUT.union(Self::CHILDREN_ORDER);

    /// Returns true if any layout-affecting flags are set.
    #[inline]
    pub fn needs_layout(&self) -> bool {
        self.intersects(Self::LAYOUT | Self::CHILDREN_ORDER | Self::STYLE)
    }

    /// Returns true if the node should propagate dirty flags to ancestors.
    #[inline]
    pub fn should_propagate_to_parent(&self) -> bool {
        self.needs_layout()
    }

    /// Flags pushed onto each ancestor.
    #[inline]
    pub fn propagation_flags(&self) -> Self {
        if self.needs_layout() {
            Self::LAYOUT
        } else {
            Self::NONE
        }
    }
}

impl Default for DirtyFlags {
    fn default() -> Self {
        Self::NONE
    }
}
