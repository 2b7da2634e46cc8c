//! Discriminated rule keys.
//!
//! Rule sources written as loose mappings overload one string for several
//! meanings: `.large` is a modifier, `shoutem.ui.View.content` is a child
//! component carrying a modifier, `*` is the wildcard child, and `container`
//! is either a plain property or a nested slot. [`RuleKey::parse`] settles
//! that once, when a node is built, so matching never re-parses strings.

use std::fmt;

/// A child component selector: a tag with an optional modifier.
///
/// # Example
///
/// ```rust
/// use rubicon_style::ComponentSelector;
///
/// let sel = ComponentSelector::parse("shoutem.ui.View.content").unwrap();
/// assert_eq!(sel.tag(), "shoutem.ui.View");
/// assert_eq!(sel.modifier(), Some("content"));
///
/// let bare = ComponentSelector::parse("Button").unwrap();
/// assert_eq!(bare.modifier(), None);
///
/// assert!(ComponentSelector::parse("container").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentSelector {
    tag: String,
    modifier: Option<String>,
}

impl ComponentSelector {
    /// Selects every child with the given tag.
    pub fn tag_only(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            modifier: None,
        }
    }

    /// Selects children with the given tag while `modifier` is active on them.
    pub fn with_modifier(tag: impl Into<String>, modifier: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            modifier: Some(modifier.into()),
        }
    }

    /// Parses a dotted component key.
    ///
    /// The tag runs up to and including the last segment that starts with an
    /// uppercase letter. Anything after it is the modifier. Keys with no
    /// capitalised segment are not component selectors.
    pub fn parse(raw: &str) -> Option<Self> {
        let segments: Vec<&str> = raw.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        let tag_end = segments.iter().rposition(|s| starts_uppercase(s))?;

        let tag = segments[..=tag_end].join(".");
        let rest = &segments[tag_end + 1..];
        if rest.is_empty() {
            Some(Self::tag_only(tag))
        } else {
            Some(Self::with_modifier(tag, rest.join(".")))
        }
    }

    /// Returns the component tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the modifier, if this selector requires one.
    pub fn modifier(&self) -> Option<&str> {
        self.modifier.as_deref()
    }
}

impl fmt::Display for ComponentSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.modifier {
            Some(modifier) => write!(f, "{}.{}", self.tag, modifier),
            None => f.write_str(&self.tag),
        }
    }
}

fn starts_uppercase(segment: &str) -> bool {
    segment.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// The role of one key inside a rule node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleKey {
    /// A plain style property.
    Property(String),
    /// A nested slot of the rendered component, merged key by key.
    NestedSlot(String),
    /// A modifier child, applied while the modifier is active.
    Modifier(String),
    /// A child component entry, applied when resolving that nested path.
    Component(ComponentSelector),
    /// The wildcard child, applied to every direct child component.
    Wildcard,
}

impl RuleKey {
    /// Classifies a raw key.
    ///
    /// `value_is_mapping` tells apart a nested slot (`container: {...}`) from
    /// a plain property (`padding: 4`) for lowercase keys.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rubicon_style::{ComponentSelector, RuleKey};
    ///
    /// assert_eq!(RuleKey::parse("*", true), RuleKey::Wildcard);
    /// assert_eq!(RuleKey::parse(".large", true), RuleKey::Modifier("large".into()));
    /// assert_eq!(
    ///     RuleKey::parse("Button.clear", true),
    ///     RuleKey::Component(ComponentSelector::with_modifier("Button", "clear")),
    /// );
    /// assert_eq!(RuleKey::parse("container", true), RuleKey::NestedSlot("container".into()));
    /// assert_eq!(RuleKey::parse("padding", false), RuleKey::Property("padding".into()));
    /// ```
    pub fn parse(raw: &str, value_is_mapping: bool) -> Self {
        if raw == "*" {
            return RuleKey::Wildcard;
        }
        if let Some(modifier) = raw.strip_prefix('.') {
            return RuleKey::Modifier(modifier.to_string());
        }
        if let Some(selector) = ComponentSelector::parse(raw) {
            return RuleKey::Component(selector);
        }
        if value_is_mapping {
            RuleKey::NestedSlot(raw.to_string())
        } else {
            RuleKey::Property(raw.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_namespaced_tag() {
        let sel = ComponentSelector::parse("shoutem.ui.Image").unwrap();
        assert_eq!(sel.tag(), "shoutem.ui.Image");
        assert_eq!(sel.modifier(), None);
    }

    #[test]
    fn test_parse_namespaced_tag_with_hyphenated_modifier() {
        let sel = ComponentSelector::parse("shoutem.ui.Button.full-width").unwrap();
        assert_eq!(sel.tag(), "shoutem.ui.Button");
        assert_eq!(sel.modifier(), Some("full-width"));
        assert_eq!(sel.to_string(), "shoutem.ui.Button.full-width");
    }

    #[test]
    fn test_parse_rejects_lowercase_and_empty_segments() {
        assert!(ComponentSelector::parse("fillParent").is_none());
        assert!(ComponentSelector::parse("fill-parent").is_none());
        assert!(ComponentSelector::parse("shoutem..View").is_none());
        assert!(ComponentSelector::parse("").is_none());
    }

    #[test]
    fn test_rule_key_property_vs_slot() {
        assert_eq!(
            RuleKey::parse("shadowOffset", true),
            RuleKey::NestedSlot("shadowOffset".to_string())
        );
        assert_eq!(
            RuleKey::parse("shadowOffset", false),
            RuleKey::Property("shadowOffset".to_string())
        );
    }

    #[test]
    fn test_rule_key_modifier_keeps_hyphens() {
        assert_eq!(
            RuleKey::parse(".sm-gutter-left", true),
            RuleKey::Modifier("sm-gutter-left".to_string())
        );
    }
}
