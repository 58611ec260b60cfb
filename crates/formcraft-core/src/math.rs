//! Vector math re-exported from [`glam`].
//!
//! Pointer positions and overlay offsets are plain [`Vec2`] values.
//!
//! ```
//! use formcraft_core::math::Vec2;
//!
//! let pointer = Vec2::new(120.0, 48.0);
//! let overlay_size = Vec2::new(150.0, 50.0);
//! assert_eq!(pointer - overlay_size / 2.0, Vec2::new(45.0, 23.0));
//! ```
//!
//! [`glam`]: https://docs.rs/glam

pub use glam::Vec2;
