//! Specialized collection types

pub use slotmap::{SecondaryMap, SlotMap};

slotmap::new_key_type! {
    /// Stable identity of a text span inside a container
    pub struct SpanKey;

    /// Handle to a sprite owned by a video backend
    pub struct SpriteKey;
}

/// Handle-based map using slot map for stable references
pub type HandleMap<K, T> = SlotMap<K, T>;
