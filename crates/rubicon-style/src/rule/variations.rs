//! Generated modifier families.

use crate::style::StyleValue;

use super::node::RuleNode;

/// The side suffixes used by spacing families, base entry first.
pub const SIDE_SUFFIXES: &[&str] = &["", "left", "right", "top", "bottom", "horizontal", "vertical"];

/// Generates one modifier child per suffix.
///
/// An empty suffix yields the base modifier setting `property` itself. Any
/// other suffix yields `base-suffix` setting `property` with the suffix
/// capitalised and appended.
///
/// # Example
///
/// ```rust
/// use rubicon_style::{variations, StyleValue, SIDE_SUFFIXES};
///
/// let family = variations("sm-gutter", SIDE_SUFFIXES, "padding", 5);
/// assert_eq!(family.len(), 7);
///
/// let (name, node) = &family[1];
/// assert_eq!(name, "sm-gutter-left");
/// assert_eq!(node.properties()["paddingLeft"], StyleValue::Number(5.0));
/// ```
pub fn variations<V>(base: &str, suffixes: &[&str], property: &str, value: V) -> Vec<(String, RuleNode)>
where
    V: Into<StyleValue>,
{
    let value = value.into();
    suffixes
        .iter()
        .map(|suffix| {
            if suffix.is_empty() {
                (base.to_string(), RuleNode::new().set(property, value.clone()))
            } else {
                (
                    format!("{}-{}", base, suffix),
                    RuleNode::new().set(format!("{}{}", property, upper_first(suffix)), value.clone()),
                )
            }
        })
        .collect()
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
