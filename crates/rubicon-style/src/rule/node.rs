//! Rule nodes: the typed unit of the style rule tree.

use std::collections::BTreeMap;

use crate::animation::Animation;
use crate::style::{StyleMap, StyleValue};

use super::key::{ComponentSelector, RuleKey};
use super::variations::variations;

/// One node of the rule tree.
///
/// A node is scoped either to a top-level component tag or to a child key of
/// another node. Each kind of content has its own field, so nothing is
/// re-interpreted at resolution time:
///
/// - **inclusions**: fragment names spliced in before the node's own keys
/// - **properties**: plain values and nested slots ([`StyleValue::Map`])
/// - **slot children**: nested slots that include fragments of their own
/// - **modifier children**: applied while the modifier is active
/// - **component children**: applied when resolving that child path
/// - **wildcard child**: applied to every direct child component
/// - **animations**: collected, never evaluated during resolution
///
/// # Duplicate keys
///
/// Declaring the same key twice keeps the first position and the last value,
/// the way an object literal behaves. Inclusions accumulate in call order.
///
/// # Example
///
/// ```rust
/// use rubicon_style::{RuleNode, StyleValue};
///
/// let button = RuleNode::new()
///     .include("base")
///     .set("padding", 8)
///     .modifier("large", RuleNode::new().set("padding", 16))
///     .child("Text", RuleNode::new().set("fontWeight", "500"))
///     .wildcard(RuleNode::new().set("marginBottom", 10))
///     .set("shadowOffset", StyleValue::map([("width", 1), ("height", 1)]));
///
/// assert_eq!(button.inclusions(), ["base"]);
/// assert_eq!(button.properties().len(), 2);
/// assert!(button.modifier_child("large").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleNode {
    includes: Vec<String>,
    properties: StyleMap,
    slots: Vec<(String, RuleNode)>,
    modifiers: Vec<(String, RuleNode)>,
    components: Vec<(ComponentSelector, RuleNode)>,
    wildcard: Option<Box<RuleNode>>,
    animations: BTreeMap<String, Animation>,
}

impl RuleNode {
    /// Creates an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an inclusion directive.
    pub fn include(mut self, fragment: impl Into<String>) -> Self {
        self.includes.push(fragment.into());
        self
    }

    /// Appends several inclusion directives in order.
    pub fn include_all<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes.extend(fragments.into_iter().map(Into::into));
        self
    }

    /// Sets a property. A [`StyleValue::Map`] value declares a nested slot.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        let key = key.into();
        self.slots.retain(|(name, _)| *name != key);
        self.properties.insert(key, value.into());
        self
    }

    /// Adds a modifier child, active while `name` is in the modifier set.
    pub fn modifier(mut self, name: impl Into<String>, node: RuleNode) -> Self {
        upsert(&mut self.modifiers, name.into(), node);
        self
    }

    /// Adds a child component entry.
    pub fn component(mut self, selector: ComponentSelector, node: RuleNode) -> Self {
        upsert(&mut self.components, selector, node);
        self
    }

    /// Adds a child component entry for a bare tag.
    pub fn child(self, tag: impl Into<String>, node: RuleNode) -> Self {
        self.component(ComponentSelector::tag_only(tag), node)
    }

    /// Adds the same child entry under several component tags.
    pub fn shared<I, S>(mut self, tags: I, node: RuleNode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            self = self.child(tag, node.clone());
        }
        self
    }

    /// Sets the wildcard child, applied to every direct child component.
    pub fn wildcard(mut self, node: RuleNode) -> Self {
        self.wildcard = Some(Box::new(node));
        self
    }

    /// Adds a named animation.
    pub fn animation(mut self, name: impl Into<String>, animation: Animation) -> Self {
        self.animations.insert(name.into(), animation);
        self
    }

    /// Adds a child by raw key, classifying it with [`RuleKey::parse`].
    ///
    /// Slot and property keys go through [`RuleNode::slot`].
    pub fn entry(self, raw: &str, node: RuleNode) -> Self {
        match RuleKey::parse(raw, true) {
            RuleKey::Modifier(name) => self.modifier(name, node),
            RuleKey::Component(selector) => self.component(selector, node),
            RuleKey::Wildcard => self.wildcard(node),
            RuleKey::NestedSlot(name) | RuleKey::Property(name) => self.slot(name, node),
        }
    }

    /// Declares a nested slot from the properties of `node`.
    ///
    /// A slot is merged key by key with the same slot from other layers.
    /// Inclusions inside `node` splice the included fragments' properties into
    /// the slot, before the slot's own keys. Modifier, component, wildcard and
    /// animation entries have nowhere to go and are dropped.
    ///
    /// ```rust
    /// use rubicon_style::RuleNode;
    ///
    /// let bar = RuleNode::new().slot(
    ///     "container",
    ///     RuleNode::new().include("featuredBackground").set("borderBottomWidth", 0),
    /// );
    /// assert!(bar.properties().is_empty());
    /// assert_eq!(bar.slot_children().count(), 1);
    /// ```
    pub fn slot(mut self, name: impl Into<String>, node: RuleNode) -> Self {
        let name = name.into();
        if node.has_structure() {
            tracing::warn!(slot = %name, "slot entry carries selectors that will be ignored");
        }
        if node.includes.is_empty() && node.slots.is_empty() {
            return self.set(name, StyleValue::Map(node.properties));
        }

        self.properties.remove(&name);
        let slot = RuleNode {
            includes: node.includes,
            properties: node.properties,
            slots: node.slots,
            ..RuleNode::default()
        };
        upsert(&mut self.slots, name, slot);
        self
    }

    /// Adds the modifier children generated by [`variations`].
    pub fn variations<V>(mut self, base: &str, suffixes: &[&str], property: &str, value: V) -> Self
    where
        V: Into<StyleValue>,
    {
        for (name, node) in variations(base, suffixes, property, value) {
            self = self.modifier(name, node);
        }
        self
    }

    /// Returns the inclusion directives in declaration order.
    pub fn inclusions(&self) -> &[String] {
        &self.includes
    }

    /// Returns the directly-declared properties.
    pub fn properties(&self) -> &StyleMap {
        &self.properties
    }

    /// Returns the slots that carry inclusions, in declaration order.
    ///
    /// Slots without inclusions are stored as plain [`StyleValue::Map`]
    /// properties instead.
    pub fn slot_children(&self) -> impl Iterator<Item = (&str, &RuleNode)> + '_ {
        self.slots.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Returns the modifier children in declaration order.
    pub fn modifier_children(&self) -> impl Iterator<Item = (&str, &RuleNode)> + '_ {
        self.modifiers.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Returns the modifier child for `name`, if declared.
    pub fn modifier_child(&self, name: &str) -> Option<&RuleNode> {
        self.modifiers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    /// Returns the component children in declaration order.
    pub fn component_children(&self) -> impl Iterator<Item = (&ComponentSelector, &RuleNode)> + '_ {
        self.components.iter().map(|(sel, node)| (sel, node))
    }

    /// Returns the wildcard child, if declared.
    pub fn wildcard_child(&self) -> Option<&RuleNode> {
        self.wildcard.as_deref()
    }

    /// Returns the animation entries.
    pub fn animations(&self) -> &BTreeMap<String, Animation> {
        &self.animations
    }

    /// Returns true if the node declares nothing at all.
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty()
            && self.properties.is_empty()
            && self.slots.is_empty()
            && !self.has_structure()
    }

    fn has_structure(&self) -> bool {
        !self.modifiers.is_empty()
            || !self.components.is_empty()
            || self.wildcard.is_some()
            || !self.animations.is_empty()
    }

    /// Visits every inclusion directive in this node and all nested children.
    pub(crate) fn for_each_inclusion<'a>(&'a self, visit: &mut impl FnMut(&'a str)) {
        for name in &self.includes {
            visit(name);
        }
        for (_, slot) in &self.slots {
            slot.for_each_inclusion(visit);
        }
        for (_, child) in &self.modifiers {
            child.for_each_inclusion(visit);
        }
        for (_, child) in &self.components {
            child.for_each_inclusion(visit);
        }
        if let Some(child) = &self.wildcard {
            child.for_each_inclusion(visit);
        }
    }
}

fn upsert<K: PartialEq>(entries: &mut Vec<(K, RuleNode)>, key: K, node: RuleNode) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some((_, existing)) => *existing = node,
        None => entries.push((key, node)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_empty() {
        assert!(RuleNode::new().is_empty());
        assert!(!RuleNode::new().include("x").is_empty());
    }

    #[test]
    fn test_duplicate_modifier_keeps_position_takes_last_value() {
        let node = RuleNode::new()
            .modifier("a", RuleNode::new().set("v", 1))
            .modifier("b", RuleNode::new())
            .modifier("a", RuleNode::new().set("v", 2));

        let names: Vec<&str> = node.modifier_children().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(
            node.modifier_child("a").unwrap().properties()["v"],
            StyleValue::from(2)
        );
    }

    #[test]
    fn test_duplicate_property_last_value_wins() {
        let node = RuleNode::new().set("flex", 1).set("flex", 0);
        assert_eq!(node.properties()["flex"], StyleValue::from(0));
    }

    #[test]
    fn test_includes_accumulate() {
        let node = RuleNode::new()
            .include("a")
            .include_all(["b", "c"])
            .include("a");
        assert_eq!(node.inclusions(), ["a", "b", "c", "a"]);
    }

    #[test]
    fn test_entry_classifies_keys() {
        let node = RuleNode::new()
            .entry(".clear", RuleNode::new().set("backgroundColor", "transparent"))
            .entry("shoutem.ui.View.content", RuleNode::new().set("flex", 1))
            .entry("*", RuleNode::new().set("marginBottom", 10))
            .entry("container", RuleNode::new().set("padding", 2));

        assert!(node.modifier_child("clear").is_some());
        let (sel, _) = node.component_children().next().unwrap();
        assert_eq!(sel.tag(), "shoutem.ui.View");
        assert_eq!(sel.modifier(), Some("content"));
        assert!(node.wildcard_child().is_some());
        assert!(node.properties()["container"].is_map());
    }

    #[test]
    fn test_shared_registers_each_tag() {
        let node = RuleNode::new().shared(["Title", "Text"], RuleNode::new().set("flex", 1));
        let tags: Vec<&str> = node.component_children().map(|(s, _)| s.tag()).collect();
        assert_eq!(tags, ["Title", "Text"]);
    }

    #[test]
    fn test_for_each_inclusion_walks_nested_children() {
        let node = RuleNode::new()
            .include("top")
            .modifier("m", RuleNode::new().include("in-modifier"))
            .child("Text", RuleNode::new().include("in-child"))
            .wildcard(RuleNode::new().include("in-wildcard"))
            .slot("container", RuleNode::new().include("in-slot"));

        let mut seen = Vec::new();
        node.for_each_inclusion(&mut |name| seen.push(name));
        assert_eq!(
            seen,
            ["top", "in-slot", "in-modifier", "in-child", "in-wildcard"]
        );
    }

    #[test]
    fn test_slot_with_inclusion_is_kept_apart_from_properties() {
        let node = RuleNode::new()
            .set("container", StyleValue::map([("padding", 1)]))
            .slot(
                "container",
                RuleNode::new().include("background").set("borderWidth", 0),
            );

        assert!(!node.properties().contains_key("container"));
        let (name, slot) = node.slot_children().next().unwrap();
        assert_eq!(name, "container");
        assert_eq!(slot.inclusions(), ["background"]);
        assert_eq!(slot.properties()["borderWidth"], StyleValue::from(0));
    }

    #[test]
    fn test_set_replaces_included_slot() {
        let node = RuleNode::new()
            .slot("container", RuleNode::new().include("background"))
            .set("container", StyleValue::map([("padding", 1)]));

        assert_eq!(node.slot_children().count(), 0);
        assert!(node.properties()["container"].is_map());
        assert!(!node.is_empty());
    }
}
