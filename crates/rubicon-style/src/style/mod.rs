//! Style values and the merge engine.
//!
//! A resolved style is a plain [`StyleMap`]: property names to [`StyleValue`]s.
//! Layers of partial styles are folded together by [`merge::merge_layers`],
//! which replaces scalars and merges nested slots key by key.

pub mod merge;
mod value;

pub use merge::{merge_into, merge_layers};
pub use value::{StyleMap, StyleValue};

/// The flattened output of one resolution.
pub type ResolvedStyle = StyleMap;
