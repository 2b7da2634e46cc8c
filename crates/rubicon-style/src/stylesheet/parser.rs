//! YAML stylesheet parser.
//!
//! Every top-level key names a fragment and maps to a rule node. Inside a
//! node, keys are classified with [`RuleKey::parse`], plus two reserved keys:
//!
//! - `$include`: a fragment name or a list of them, also allowed inside a
//!   nested slot
//! - `$animations`: a mapping from animation name to `{ kind, ...captures }`
//!
//! ```yaml
//! base:
//!   color: red
//!   padding: 4
//!
//! Button:
//!   $include: [base]
//!   padding: 8
//!   shadowOffset: { width: 1, height: 1 }
//!   container:
//!     $include: rounded
//!     borderWidth: 0
//!   .large:
//!     padding: 16
//!   Text:
//!     fontWeight: "500"
//!   "*":
//!     marginBottom: 10
//!   $animations:
//!     fadeOut:
//!       kind: interpolate
//!       property: opacity
//!       inputRange: [0, 100]
//!       outputRange: [1, 0]
//! ```

use serde_yaml::{Mapping, Value};

use super::error::StylesheetError;
use crate::animation::AnimationCatalog;
use crate::rule::{RuleKey, RuleNode};
use crate::style::{StyleMap, StyleValue};

const INCLUDE_KEY: &str = "$include";
const ANIMATIONS_KEY: &str = "$animations";
const KIND_KEY: &str = "kind";

/// Parses a YAML stylesheet into named rule nodes, in document order.
///
/// # Errors
///
/// - [`StylesheetError::Parse`] if the YAML is malformed, has duplicate keys,
///   or is not a mapping
/// - [`StylesheetError::InvalidDefinition`] for values of the wrong shape
/// - [`StylesheetError::UnknownAnimationKind`] for kinds missing from `catalog`
pub fn parse_stylesheet(
    yaml: &str,
    catalog: &AnimationCatalog,
) -> Result<Vec<(String, RuleNode)>, StylesheetError> {
    let root: Value = serde_yaml::from_str(yaml).map_err(|e| StylesheetError::Parse {
        path: None,
        message: e.to_string(),
    })?;

    let mapping = match &root {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Ok(Vec::new()),
        _ => {
            return Err(StylesheetError::Parse {
                path: None,
                message: "stylesheet must be a YAML mapping".to_string(),
            })
        }
    };

    let mut fragments = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let name = key.as_str().ok_or_else(|| StylesheetError::Parse {
            path: None,
            message: format!("fragment name must be a string, got {:?}", key),
        })?;
        let parser = NodeParser {
            fragment: name,
            catalog,
        };
        let node = parser.node(value, name)?;
        fragments.push((name.to_string(), node));
    }

    tracing::debug!(fragments = fragments.len(), "parsed stylesheet");
    Ok(fragments)
}

struct NodeParser<'a> {
    fragment: &'a str,
    catalog: &'a AnimationCatalog,
}

impl NodeParser<'_> {
    fn node(&self, value: &Value, at: &str) -> Result<RuleNode, StylesheetError> {
        let mapping = value
            .as_mapping()
            .ok_or_else(|| self.invalid(format!("'{}' must be a mapping, got {}", at, kind_of(value))))?;

        let mut node = RuleNode::new();
        for (key, value) in mapping {
            let key = key
                .as_str()
                .ok_or_else(|| self.invalid(format!("non-string key {:?} in '{}'", key, at)))?;

            node = match key {
                INCLUDE_KEY => node.include_all(self.includes(value)?),
                ANIMATIONS_KEY => self.animations(node, value)?,
                _ if key.starts_with('$') => {
                    return Err(self.invalid(format!("unknown directive '{}'", key)));
                }
                _ => match RuleKey::parse(key, value.is_mapping()) {
                    RuleKey::Modifier(name) => node.modifier(name, self.node(value, key)?),
                    RuleKey::Component(selector) => {
                        node.component(selector, self.node(value, key)?)
                    }
                    RuleKey::Wildcard => node.wildcard(self.node(value, key)?),
                    RuleKey::NestedSlot(name) => match value {
                        Value::Mapping(mapping) => node.slot(name, self.slot(mapping, key)?),
                        _ => node.set(name, self.value(value, key)?),
                    },
                    RuleKey::Property(name) => {
                        let value = self.value(value, key)?;
                        node.set(name, value)
                    }
                },
            };
        }
        Ok(node)
    }

    fn includes(&self, value: &Value) -> Result<Vec<String>, StylesheetError> {
        match value {
            Value::String(name) => Ok(vec![name.clone()]),
            Value::Sequence(items) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        self.invalid(format!("{} entries must be strings", INCLUDE_KEY))
                    })
                })
                .collect(),
            other => Err(self.invalid(format!(
                "{} must be a name or a list of names, got {}",
                INCLUDE_KEY,
                kind_of(other)
            ))),
        }
    }

    fn animations(&self, mut node: RuleNode, value: &Value) -> Result<RuleNode, StylesheetError> {
        let entries = value
            .as_mapping()
            .ok_or_else(|| self.invalid(format!("{} must be a mapping", ANIMATIONS_KEY)))?;

        for (name, definition) in entries {
            let name = name
                .as_str()
                .ok_or_else(|| self.invalid("animation names must be strings".to_string()))?;
            let definition = definition
                .as_mapping()
                .ok_or_else(|| self.invalid(format!("animation '{}' must be a mapping", name)))?;

            let kind = definition
                .get(KIND_KEY)
                .and_then(Value::as_str)
                .ok_or_else(|| self.invalid(format!("animation '{}' needs a string 'kind'", name)))?;

            let mut captures = StyleMap::new();
            for (key, value) in definition {
                let Some(key) = key.as_str() else {
                    return Err(self.invalid(format!("non-string capture key in animation '{}'", name)));
                };
                if key != KIND_KEY {
                    captures.insert(key.to_string(), self.value(value, key)?);
                }
            }

            let animation = self.catalog.instantiate(kind, captures).ok_or_else(|| {
                StylesheetError::UnknownAnimationKind {
                    fragment: self.fragment.to_string(),
                    animation: name.to_string(),
                    kind: kind.to_string(),
                }
            })?;
            node = node.animation(name, animation);
        }
        Ok(node)
    }

    fn value(&self, value: &Value, at: &str) -> Result<StyleValue, StylesheetError> {
        match value {
            Value::Bool(b) => Ok(StyleValue::Bool(*b)),
            Value::Number(n) => n
                .as_f64()
                .map(StyleValue::Number)
                .ok_or_else(|| self.invalid(format!("'{}' is not a representable number", at))),
            Value::String(s) => Ok(StyleValue::Text(s.clone())),
            Value::Sequence(items) => items
                .iter()
                .map(|item| self.value(item, at))
                .collect::<Result<Vec<_>, _>>()
                .map(StyleValue::List),
            Value::Mapping(mapping) => self.map(mapping, at).map(StyleValue::Map),
            Value::Null | Value::Tagged(_) => Err(self.invalid(format!(
                "'{}' has unsupported value {}",
                at,
                kind_of(value)
            ))),
        }
    }

    /// A nested slot: plain values, deeper slots and inclusions.
    fn slot(&self, mapping: &Mapping, at: &str) -> Result<RuleNode, StylesheetError> {
        let mut slot = RuleNode::new();
        for (key, value) in mapping {
            let key = key
                .as_str()
                .ok_or_else(|| self.invalid(format!("non-string key {:?} in '{}'", key, at)))?;
            slot = match (key, value) {
                (INCLUDE_KEY, _) => slot.include_all(self.includes(value)?),
                _ if key.starts_with('$') => {
                    return Err(self.invalid(format!("unknown directive '{}' in slot '{}'", key, at)));
                }
                (_, Value::Mapping(inner)) => slot.slot(key, self.slot(inner, key)?),
                _ => slot.set(key, self.value(value, key)?),
            };
        }
        Ok(slot)
    }

    fn map(&self, mapping: &Mapping, at: &str) -> Result<StyleMap, StylesheetError> {
        let mut map = StyleMap::new();
        for (key, value) in mapping {
            let key = key
                .as_str()
                .ok_or_else(|| self.invalid(format!("non-string key {:?} in '{}'", key, at)))?;
            map.insert(key.to_string(), self.value(value, key)?);
        }
        Ok(map)
    }

    fn invalid(&self, message: String) -> StylesheetError {
        StylesheetError::InvalidDefinition {
            fragment: self.fragment.to_string(),
            message,
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
