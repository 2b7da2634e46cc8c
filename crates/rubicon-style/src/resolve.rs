//! Resolution entry points.
//!
//! [`SealedStore::resolve`] runs the whole pipeline for one
//! [`ResolutionContext`]: expansion, selector matching, merging and animation
//! binding. Every call builds its own [`Expander`], so calls share nothing
//! but the sealed store and may run on any number of threads at once.
//!
//! # Example
//!
//! ```rust
//! use rubicon_style::{FragmentStore, PathSegment, ResolutionContext, RuleNode, StyleValue};
//!
//! let mut store = FragmentStore::new();
//! store.register("base", RuleNode::new().set("color", "red").set("padding", 4)).unwrap();
//! store
//!     .register(
//!         "Button",
//!         RuleNode::new()
//!             .include("base")
//!             .set("padding", 8)
//!             .modifier("large", RuleNode::new().set("padding", 16)),
//!     )
//!     .unwrap();
//! let store = store.seal().unwrap();
//!
//! let plain = store.resolve(&ResolutionContext::for_tag("Button")).unwrap();
//! assert_eq!(plain.style["padding"], StyleValue::from(8));
//!
//! let large = store
//!     .resolve(&ResolutionContext::new(PathSegment::new("Button").modifier("large")))
//!     .unwrap();
//! assert_eq!(large.style["color"], StyleValue::from("red"));
//! assert_eq!(large.style["padding"], StyleValue::from(16));
//! ```

use std::collections::BTreeMap;

use crate::animation::{bind_animations, AnimationContext, BoundAnimations};
use crate::error::Result;
use crate::expand::Expander;
use crate::matcher::{match_path, PathSegment, ResolutionContext};
use crate::store::SealedStore;
use crate::style::{merge_layers, ResolvedStyle, StyleMap};

/// The output of one resolution.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// The flattened style.
    pub style: ResolvedStyle,
    /// Animation functions bound for this context, by name.
    pub animations: BoundAnimations,
}

impl Resolution {
    /// Evaluates every bound animation for one driver value.
    pub fn evaluate_animations(&self, driver: f64, cx: &AnimationContext) -> BTreeMap<String, StyleMap> {
        self.animations
            .iter()
            .map(|(name, animation)| (name.clone(), animation.evaluate(driver, cx)))
            .collect()
    }
}

impl SealedStore {
    /// Resolves the style and animations for the leaf of `context`.
    ///
    /// Unregistered tags and selector keys that match nothing contribute
    /// nothing; they are not errors.
    ///
    /// # Errors
    ///
    /// Only [`crate::StyleError::InclusionDepthExceeded`] can occur on a
    /// sealed store, when inclusions nest deeper than the configured limit.
    pub fn resolve(&self, context: &ResolutionContext) -> Result<Resolution> {
        let mut expander = Expander::new(self);
        let layers = match_path(&mut expander, context)?;

        let style = merge_layers(layers.iter().map(|layer| layer.node.properties()));
        let animations = bind_animations(layers.iter().map(|layer| layer.node.animations()));

        tracing::debug!(
            path = %context,
            layers = layers.len(),
            properties = style.len(),
            animations = animations.len(),
            "resolved style"
        );
        Ok(Resolution { style, animations })
    }

    /// Resolves a root component with the given active modifiers.
    pub fn resolve_tag<I, S>(&self, tag: &str, modifiers: I) -> Result<Resolution>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resolve(&ResolutionContext::new(PathSegment::new(tag).modifiers(modifiers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animation;
    use crate::rule::RuleNode;
    use crate::store::FragmentStore;
    use crate::style::StyleValue;

    fn echo(driver: f64, _cx: &AnimationContext, captures: &StyleMap) -> StyleMap {
        let mut out = captures.clone();
        out.insert("driver".into(), driver.into());
        out
    }

    fn button_store() -> SealedStore {
        let mut store = FragmentStore::new();
        store
            .register("base", RuleNode::new().set("color", "red").set("padding", 4))
            .unwrap();
        store
            .register(
                "Button",
                RuleNode::new()
                    .include("base")
                    .set("padding", 8)
                    .modifier("large", RuleNode::new().set("padding", 16))
                    .modifier("clear", RuleNode::new().set("backgroundColor", "transparent"))
                    .animation("press", Animation::new(echo).capture("scale", 0.9)),
            )
            .unwrap();
        store.seal().unwrap()
    }

    #[test]
    fn test_resolve_without_modifiers() {
        let store = button_store();
        let resolution = store.resolve_tag("Button", Vec::<String>::new()).unwrap();

        assert_eq!(resolution.style.len(), 2);
        assert_eq!(resolution.style["color"], StyleValue::from("red"));
        assert_eq!(resolution.style["padding"], StyleValue::from(8));
    }

    #[test]
    fn test_resolve_with_modifier() {
        let store = button_store();
        let resolution = store.resolve_tag("Button", ["large"]).unwrap();
        assert_eq!(resolution.style["padding"], StyleValue::from(16));
        assert!(!resolution.style.contains_key("backgroundColor"));
    }

    #[test]
    fn test_unknown_modifier_is_ignored() {
        let store = button_store();
        let plain = store.resolve_tag("Button", Vec::<String>::new()).unwrap();
        let unknown = store.resolve_tag("Button", ["nope"]).unwrap();
        assert_eq!(plain.style, unknown.style);
    }

    #[test]
    fn test_unknown_root_is_empty() {
        let store = button_store();
        let resolution = store.resolve(&ResolutionContext::for_tag("Ghost")).unwrap();
        assert!(resolution.style.is_empty());
        assert!(resolution.animations.is_empty());
    }

    #[test]
    fn test_animations_are_bound_not_evaluated() {
        let store = button_store();
        let resolution = store.resolve_tag("Button", Vec::<String>::new()).unwrap();
        assert!(resolution.animations.contains_key("press"));

        let frames = resolution.evaluate_animations(0.5, &AnimationContext::default());
        assert_eq!(frames["press"]["scale"], StyleValue::from(0.9));
        assert_eq!(frames["press"]["driver"], StyleValue::from(0.5));
    }
}
