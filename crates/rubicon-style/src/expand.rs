//! Inclusion expansion.
//!
//! [`Expander`] splices inclusion directives into rule nodes. Plain
//! properties and animations are merged right away: inclusions first, in
//! declaration order, then the node's own keys, which therefore win. A nested
//! slot with inclusions of its own is expanded the same way and merged into
//! the node's properties under the slot name. Modifier,
//! component and wildcard children are kept as ordered lists of raw layers so
//! the matcher can pick the ones that apply to a resolution context.
//!
//! Expanded fragments are memoized by name for the lifetime of one
//! [`Expander`]. An expander is created per resolution call and dropped with
//! it, so the memo never crosses calls or threads.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::animation::Animation;
use crate::error::{Result, StyleError};
use crate::rule::{ComponentSelector, RuleNode};
use crate::store::SealedStore;
use crate::style::{merge_into, StyleMap, StyleValue};

/// A rule node with its inclusions spliced in.
#[derive(Debug, Default)]
pub struct ExpandedNode<'a> {
    properties: StyleMap,
    animations: BTreeMap<String, Animation>,
    modifiers: Vec<(&'a str, Vec<&'a RuleNode>)>,
    components: Vec<(&'a ComponentSelector, Vec<&'a RuleNode>)>,
    wildcard: Vec<&'a RuleNode>,
}

impl<'a> ExpandedNode<'a> {
    /// Returns the merged plain properties.
    pub fn properties(&self) -> &StyleMap {
        &self.properties
    }

    /// Returns the merged animation entries.
    pub fn animations(&self) -> &BTreeMap<String, Animation> {
        &self.animations
    }

    /// Returns the layers of the modifier child `name`, lowest priority first.
    pub fn modifier_layers(&self, name: &str) -> &[&'a RuleNode] {
        self.modifiers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, layers)| layers.as_slice())
            .unwrap_or_default()
    }

    /// Returns the layers of the component child matching `tag` and
    /// `modifier` exactly, lowest priority first.
    pub fn component_layers(&self, tag: &str, modifier: Option<&str>) -> &[&'a RuleNode] {
        self.components
            .iter()
            .find(|(sel, _)| sel.tag() == tag && sel.modifier() == modifier)
            .map(|(_, layers)| layers.as_slice())
            .unwrap_or_default()
    }

    /// Returns the wildcard child layers, lowest priority first.
    pub fn wildcard_layers(&self) -> &[&'a RuleNode] {
        &self.wildcard
    }

    fn absorb(&mut self, included: &ExpandedNode<'a>) {
        merge_into(&mut self.properties, &included.properties);
        for (name, animation) in &included.animations {
            self.animations.insert(name.clone(), animation.clone());
        }
        for (name, layers) in &included.modifiers {
            push_layers(&mut self.modifiers, *name, layers.iter().copied());
        }
        for (selector, layers) in &included.components {
            push_layers(&mut self.components, *selector, layers.iter().copied());
        }
        self.wildcard.extend(included.wildcard.iter().copied());
    }

    fn absorb_slot(&mut self, name: &str, slot: StyleMap) {
        let mut layer = StyleMap::new();
        layer.insert(name.to_string(), StyleValue::Map(slot));
        merge_into(&mut self.properties, &layer);
    }

    fn absorb_own(&mut self, node: &'a RuleNode) {
        merge_into(&mut self.properties, node.properties());
        for (name, animation) in node.animations() {
            self.animations.insert(name.clone(), animation.clone());
        }
        for (name, child) in node.modifier_children() {
            push_layers(&mut self.modifiers, name, [child]);
        }
        for (selector, child) in node.component_children() {
            push_layers(&mut self.components, selector, [child]);
        }
        if let Some(child) = node.wildcard_child() {
            self.wildcard.push(child);
        }
    }
}

fn push_layers<'a, K, I>(entries: &mut Vec<(K, Vec<&'a RuleNode>)>, key: K, layers: I)
where
    K: PartialEq,
    I: IntoIterator<Item = &'a RuleNode>,
{
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some((_, existing)) => existing.extend(layers),
        None => entries.push((key, layers.into_iter().collect())),
    }
}

/// Expands rule nodes against a sealed store.
pub struct Expander<'a> {
    store: &'a SealedStore,
    memo: HashMap<&'a str, Rc<ExpandedNode<'a>>>,
    stack: Vec<&'a str>,
    limit: usize,
}

impl<'a> Expander<'a> {
    /// Creates an expander with an empty memo.
    pub fn new(store: &'a SealedStore) -> Self {
        Self {
            store,
            memo: HashMap::new(),
            stack: Vec::new(),
            limit: store.config().max_inclusion_depth,
        }
    }

    /// Returns the store this expander reads from.
    pub fn store(&self) -> &'a SealedStore {
        self.store
    }

    /// Expands the fragment registered under `name`.
    ///
    /// # Errors
    ///
    /// - [`StyleError::UnknownFragment`] if `name` is not registered
    /// - [`StyleError::InclusionDepthExceeded`] if following inclusions nests
    ///   deeper than the configured limit
    pub fn expand_fragment(&mut self, name: &str) -> Result<Rc<ExpandedNode<'a>>> {
        if let Some(hit) = self.memo.get(name) {
            tracing::trace!(fragment = name, "expansion memo hit");
            return Ok(Rc::clone(hit));
        }
        if self.stack.len() >= self.limit {
            return Err(StyleError::InclusionDepthExceeded {
                name: name.to_string(),
                limit: self.limit,
            });
        }
        let (key, node) = self
            .store
            .entry(name)
            .ok_or_else(|| StyleError::UnknownFragment {
                name: name.to_string(),
                referenced_from: self.stack.last().map(|s| s.to_string()),
            })?;

        self.stack.push(key);
        let expanded = self.expand_node(node);
        self.stack.pop();

        let expanded = Rc::new(expanded?);
        self.memo.insert(key, Rc::clone(&expanded));
        Ok(expanded)
    }

    /// Expands an anonymous node, such as a modifier or component child.
    pub fn expand_node(&mut self, node: &'a RuleNode) -> Result<ExpandedNode<'a>> {
        let mut expanded = ExpandedNode::default();
        for name in node.inclusions() {
            let included = self.expand_fragment(name)?;
            expanded.absorb(&included);
        }
        expanded.absorb_own(node);
        for (name, slot) in node.slot_children() {
            let slot = self.expand_node(slot)?;
            expanded.absorb_slot(name, slot.properties);
        }
        Ok(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FragmentStore, StoreConfig};
    use crate::style::StyleValue;

    fn sealed(fragments: Vec<(&str, RuleNode)>) -> SealedStore {
        let mut store = FragmentStore::new();
        store.register_all(fragments).unwrap();
        store.seal().unwrap()
    }

    #[test]
    fn test_own_properties_override_inclusions() {
        let store = sealed(vec![
            ("base", RuleNode::new().set("color", "red").set("padding", 4)),
            ("Button", RuleNode::new().include("base").set("padding", 8)),
        ]);
        let mut expander = Expander::new(&store);
        let button = expander.expand_fragment("Button").unwrap();

        assert_eq!(button.properties()["color"], StyleValue::from("red"));
        assert_eq!(button.properties()["padding"], StyleValue::from(8));
    }

    #[test]
    fn test_later_inclusion_wins() {
        let store = sealed(vec![
            ("a", RuleNode::new().set("color", "red")),
            ("b", RuleNode::new().set("color", "blue")),
            ("x", RuleNode::new().include("a").include("b")),
            ("y", RuleNode::new().include("b").include("a")),
        ]);
        let mut expander = Expander::new(&store);

        let x = expander.expand_fragment("x").unwrap();
        let y = expander.expand_fragment("y").unwrap();
        assert_eq!(x.properties()["color"], StyleValue::from("blue"));
        assert_eq!(y.properties()["color"], StyleValue::from("red"));
    }

    #[test]
    fn test_shared_fragment_is_memoized() {
        let store = sealed(vec![
            ("shared", RuleNode::new().set("flex", 1)),
            ("left", RuleNode::new().include("shared")),
            ("right", RuleNode::new().include("shared")),
        ]);
        let mut expander = Expander::new(&store);
        expander.expand_fragment("left").unwrap();
        expander.expand_fragment("right").unwrap();

        let first = expander.expand_fragment("shared").unwrap();
        let second = expander.expand_fragment("shared").unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_children_are_preserved_as_layers() {
        let store = sealed(vec![
            (
                "base",
                RuleNode::new()
                    .modifier("large", RuleNode::new().set("padding", 12))
                    .child("Text", RuleNode::new().set("color", "grey")),
            ),
            (
                "Button",
                RuleNode::new()
                    .include("base")
                    .modifier("large", RuleNode::new().set("padding", 16))
                    .wildcard(RuleNode::new().set("marginBottom", 10)),
            ),
        ]);
        let mut expander = Expander::new(&store);
        let button = expander.expand_fragment("Button").unwrap();

        let large = button.modifier_layers("large");
        assert_eq!(large.len(), 2);
        assert_eq!(large[1].properties()["padding"], StyleValue::from(16));
        assert_eq!(button.component_layers("Text", None).len(), 1);
        assert!(button.component_layers("Text", Some("muted")).is_empty());
        assert_eq!(button.wildcard_layers().len(), 1);
        assert!(button.modifier_layers("small").is_empty());
    }

    #[test]
    fn test_slot_inclusion_is_spliced_before_own_keys() {
        let store = sealed(vec![
            (
                "featuredBackground",
                RuleNode::new()
                    .set("backgroundColor", "#222")
                    .set("borderBottomWidth", 1),
            ),
            (
                "navigationBar",
                RuleNode::new()
                    .set("container", StyleValue::map([("height", 70)]))
                    .modifier(
                        "featured",
                        RuleNode::new().slot(
                            "container",
                            RuleNode::new()
                                .include("featuredBackground")
                                .set("borderBottomWidth", 0),
                        ),
                    ),
            ),
        ]);
        let mut expander = Expander::new(&store);
        let bar = expander.expand_fragment("navigationBar").unwrap();
        let featured = expander.expand_node(bar.modifier_layers("featured")[0]).unwrap();

        let container = featured.properties()["container"].as_map().unwrap();
        assert_eq!(container["backgroundColor"], StyleValue::from("#222"));
        assert_eq!(container["borderBottomWidth"], StyleValue::from(0));
        assert!(!container.contains_key("$include"));
    }

    #[test]
    fn test_slot_merges_over_included_slot() {
        let store = sealed(vec![
            (
                "base",
                RuleNode::new().set("container", StyleValue::map([("padding", 4), ("margin", 2)])),
            ),
            ("accent", RuleNode::new().set("color", "red")),
            (
                "Card",
                RuleNode::new()
                    .include("base")
                    .slot("container", RuleNode::new().include("accent").set("padding", 8)),
            ),
        ]);
        let mut expander = Expander::new(&store);
        let card = expander.expand_fragment("Card").unwrap();

        let container = card.properties()["container"].as_map().unwrap();
        assert_eq!(container["margin"], StyleValue::from(2));
        assert_eq!(container["padding"], StyleValue::from(8));
        assert_eq!(container["color"], StyleValue::from("red"));
    }

    #[test]
    fn test_depth_limit() {
        let mut store = FragmentStore::with_config(StoreConfig {
            max_inclusion_depth: 3,
        });
        store.register("d", RuleNode::new().set("v", 1)).unwrap();
        store.register("c", RuleNode::new().include("d")).unwrap();
        store.register("b", RuleNode::new().include("c")).unwrap();
        store.register("a", RuleNode::new().include("b")).unwrap();
        let store = store.seal().unwrap();

        let mut expander = Expander::new(&store);
        assert!(expander.expand_fragment("b").is_ok());

        let mut expander = Expander::new(&store);
        let err = expander.expand_fragment("a").unwrap_err();
        assert_eq!(
            err,
            StyleError::InclusionDepthExceeded {
                name: "d".to_string(),
                limit: 3,
            }
        );
    }

    #[test]
    fn test_unknown_fragment() {
        let store = sealed(vec![]);
        let mut expander = Expander::new(&store);
        assert!(matches!(
            expander.expand_fragment("ghost"),
            Err(StyleError::UnknownFragment { .. })
        ));
    }
}
