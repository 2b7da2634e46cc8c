//! Two-tier merging of partial styles.
//!
//! Layers are applied lowest priority first:
//!
//! 1. Scalars, text, booleans and lists are overwritten (last writer wins).
//! 2. Nested slots ([`StyleValue::Map`]) present on both sides are merged
//!    recursively with the same rule, so two layers can set different
//!    properties of the same slot without clobbering each other.
//!
//! # Shape conflicts
//!
//! When one layer sets a key to a scalar and another sets it to a nested slot,
//! the higher-priority layer's shape wins outright: a map over a scalar
//! replaces it, and a scalar over a map replaces the whole map. This is a
//! defined tie-break, never an error; rule data relies on it to override a
//! compound value set by a base fragment.

use super::value::{StyleMap, StyleValue};

/// Merges `layer` over `target` in place.
///
/// # Example
///
/// ```rust
/// use rubicon_style::{merge_into, StyleMap, StyleValue};
///
/// let mut base = StyleMap::new();
/// base.insert("padding".into(), 4.into());
/// base.insert("shadowOffset".into(), StyleValue::map([("width", 1), ("height", 1)]));
///
/// let mut layer = StyleMap::new();
/// layer.insert("padding".into(), 8.into());
/// layer.insert("shadowOffset".into(), StyleValue::map([("height", 3)]));
///
/// merge_into(&mut base, &layer);
///
/// assert_eq!(base["padding"], StyleValue::Number(8.0));
/// let offset = base["shadowOffset"].as_map().unwrap();
/// assert_eq!(offset["width"], StyleValue::Number(1.0));
/// assert_eq!(offset["height"], StyleValue::Number(3.0));
/// ```
pub fn merge_into(target: &mut StyleMap, layer: &StyleMap) {
    for (key, value) in layer {
        if let StyleValue::Map(incoming) = value {
            if let Some(StyleValue::Map(existing)) = target.get_mut(key) {
                merge_into(existing, incoming);
                continue;
            }
        }
        target.insert(key.clone(), value.clone());
    }
}

/// Folds an ordered sequence of layers into one flat style.
///
/// Layers must be supplied lowest priority first.
pub fn merge_layers<'a, I>(layers: I) -> StyleMap
where
    I: IntoIterator<Item = &'a StyleMap>,
{
    let mut result = StyleMap::new();
    for layer in layers {
        merge_into(&mut result, layer);
    }
    result
}
