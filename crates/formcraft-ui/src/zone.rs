//! Drop zone classification.

use crate::tree::LayoutRect;
use formcraft_core::math::Vec2;

/// Part of a hovered node the pointer is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropZone {
    Left,
    Right,
    Top,
    Bottom,
}

impl DropZone {
    /// Left and right zones ask for a side-by-side placement.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, DropZone::Left | DropZone::Right)
    }

    /// Index of the destination inside a freshly split box.
    pub fn split_index(&self) -> usize {
        match self {
            DropZone::Left => 0,
            _ => 1,
        }
    }
}

/// Classify `pointer` against `bounds`.
///
/// The quarter-width side bands win over the vertical halves. The right band
/// starts at three times `x + width / 4`, so it sits at 75% of the width only
/// for nodes whose left edge is at the origin. Above the vertical midpoint is
/// `Top` (y grows upward). Never fails, including for pointers outside `bounds`.
pub fn detect_zone(bounds: LayoutRect, pointer: Vec2) -> DropZone {
    let side = bounds.x + bounds.width / 4.0;
    if pointer.x > side * 3.0 {
        DropZone::Right
    } else if pointer.x < side {
        DropZone::Left
    } else if pointer.y > bounds.y + bounds.height / 2.0 {
        DropZone::Top
    } else {
        DropZone::Bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> LayoutRect {
        LayoutRect::new(0.0, 0.0, 100.0, 50.0)
    }

    #[test]
    fn test_left_band_is_strict() {
        assert_eq!(detect_zone(bounds(), Vec2::new(24.0, 40.0)), DropZone::Left);
        assert_eq!(detect_zone(bounds(), Vec2::new(25.0, 40.0)), DropZone::Top);
    }

    #[test]
    fn test_right_band() {
        assert_eq!(detect_zone(bounds(), Vec2::new(90.0, 10.0)), DropZone::Right);
        assert_eq!(detect_zone(bounds(), Vec2::new(75.0, 10.0)), DropZone::Bottom);
    }

    #[test]
    fn test_vertical_halves() {
        assert_eq!(detect_zone(bounds(), Vec2::new(50.0, 40.0)), DropZone::Top);
        assert_eq!(detect_zone(bounds(), Vec2::new(50.0, 10.0)), DropZone::Bottom);
        assert_eq!(detect_zone(bounds(), Vec2::new(50.0, 25.0)), DropZone::Bottom);
    }

    #[test]
    fn test_side_bands_win_over_halves() {
        assert_eq!(detect_zone(bounds(), Vec2::new(5.0, 49.0)), DropZone::Left);
        assert_eq!(detect_zone(bounds(), Vec2::new(95.0, 1.0)), DropZone::Right);
    }

    #[test]
    fn test_offset_bounds_keep_scaled_right_band() {
        // side = 100 + 25 = 125, right band starts at 375
        let offset = LayoutRect::new(100.0, 0.0, 100.0, 50.0);
        assert_eq!(detect_zone(offset, Vec2::new(110.0, 10.0)), DropZone::Left);
        assert_eq!(detect_zone(offset, Vec2::new(190.0, 10.0)), DropZone::Bottom);
    }

    #[test]
    fn test_split_index() {
        assert_eq!(DropZone::Left.split_index(), 0);
        assert_eq!(DropZone::Right.split_index(), 1);
        assert!(DropZone::Left.is_horizontal());
        assert!(!DropZone::Top.is_horizontal());
    }
}
