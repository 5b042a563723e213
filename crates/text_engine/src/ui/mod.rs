//! UI System Module
//!
//! Architecture:
//! - widgets/: text spans and containers with flow layout
//!
//! Widgets draw through the [`VideoBackend`](crate::render::VideoBackend)
//! passed to them; they never reach for a global renderer.

pub mod widgets;

pub use widgets::{ExclusionSet, FlowLayout, TextContainer, TextSpan};
