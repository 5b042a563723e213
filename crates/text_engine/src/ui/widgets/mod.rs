//! UI widgets module
//!
//! Text spans, the containers that lay them out, and the flow layout both
//! share.

pub mod layout;
pub mod text_container;
pub mod text_span;

pub use layout::{ExclusionSet, FlowLayout};
pub use text_container::TextContainer;
pub use text_span::TextSpan;
