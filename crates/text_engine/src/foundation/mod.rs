//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Pixel geometry (points, sizes, regions)
//! - Handle collections for spans and sprites
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod logging;
