//! Style value types for properties and nested slots.

use std::collections::BTreeMap;

use serde::Serialize;

/// A flat, ordered mapping from property name to value.
///
/// Ordering is by key so two maps holding the same entries always serialize
/// to the same bytes, whatever order the entries were written in.
pub type StyleMap = BTreeMap<String, StyleValue>;

/// A single style value.
///
/// Values are opaque to the engine: colors, sizes and transforms arrive
/// already computed by whatever built the rule nodes. The one structural
/// distinction the engine cares about is [`StyleValue::Map`], which represents
/// a nested slot (a sub-object of the rendered component such as `container`
/// or `shadowOffset`) and is merged key by key instead of being replaced.
///
/// # Example
///
/// ```rust
/// use rubicon_style::StyleValue;
///
/// let padding: StyleValue = 8.into();
/// let color: StyleValue = "#222222".into();
/// let offset = StyleValue::map([("width", 1), ("height", 1)]);
///
/// assert_eq!(padding.as_number(), Some(8.0));
/// assert_eq!(color.as_str(), Some("#222222"));
/// assert!(offset.is_map());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// A boolean flag.
    Bool(bool),
    /// Any numeric value (sizes, opacities, flex factors).
    Number(f64),
    /// Any textual value (colors, enum-like keywords, font names).
    Text(String),
    /// An ordered list, e.g. a transform stack.
    List(Vec<StyleValue>),
    /// A nested slot, merged recursively.
    Map(StyleMap),
}

impl StyleValue {
    /// Builds a nested-slot value from key/value pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<StyleValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        StyleValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns true if this value is a nested slot.
    pub fn is_map(&self) -> bool {
        matches!(self, StyleValue::Map(_))
    }

    /// Returns the nested slot entries, if this is a map.
    pub fn as_map(&self) -> Option<&StyleMap> {
        match self {
            StyleValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the flag, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StyleValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        StyleValue::Bool(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<f32> for StyleValue {
    fn from(value: f32) -> Self {
        StyleValue::Number(f64::from(value))
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        StyleValue::Number(f64::from(value))
    }
}

impl From<u32> for StyleValue {
    fn from(value: u32) -> Self {
        StyleValue::Number(f64::from(value))
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

impl From<Vec<StyleValue>> for StyleValue {
    fn from(values: Vec<StyleValue>) -> Self {
        StyleValue::List(values)
    }
}

impl From<StyleMap> for StyleValue {
    fn from(map: StyleMap) -> Self {
        StyleValue::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_value_from_number() {
        let value: StyleValue = 4.into();
        assert_eq!(value, StyleValue::Number(4.0));

        let value: StyleValue = 0.5_f64.into();
        assert_eq!(value.as_number(), Some(0.5));
    }

    #[test]
    fn test_style_value_from_str() {
        let value: StyleValue = "transparent".into();
        match value {
            StyleValue::Text(s) => assert_eq!(s, "transparent"),
            _ => panic!("Expected Text"),
        }
    }

    #[test]
    fn test_style_value_map_builder() {
        let value = StyleValue::map([("width", 1), ("height", 2)]);
        let map = value.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["height"], StyleValue::Number(2.0));
    }

    #[test]
    fn test_style_value_serializes_untagged() {
        let value = StyleValue::map([("flex", StyleValue::from(1)), ("align", "center".into())]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"align":"center","flex":1.0}"#);
    }
}
