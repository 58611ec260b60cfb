//! Formcraft Core
//!
//! Shared building blocks for the formcraft layout editor: geometry, math,
//! collections, configuration, logging and profiling.

pub mod alloc;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
