//! YAML stylesheet loading.
//!
//! Rule data usually lives in a stylesheet file rather than in code. This
//! module parses such files into rule nodes and registers them into a
//! [`FragmentStore`]. Animations are bound by kind through an
//! [`AnimationCatalog`], since a text file cannot hold functions.
//!
//! # Example
//!
//! ```rust
//! use rubicon_style::{FragmentStore, StyleValue};
//!
//! let yaml = r#"
//! base:
//!   color: red
//!   padding: 4
//! Button:
//!   $include: base
//!   padding: 8
//!   .large:
//!     padding: 16
//! "#;
//!
//! let store = FragmentStore::from_yaml(yaml).unwrap().seal().unwrap();
//! let large = store.resolve_tag("Button", ["large"]).unwrap();
//! assert_eq!(large.style["color"], StyleValue::from("red"));
//! assert_eq!(large.style["padding"], StyleValue::from(16));
//! ```

mod error;
mod parser;

pub use error::StylesheetError;
pub use parser::parse_stylesheet;

use std::path::Path;

use crate::animation::AnimationCatalog;
use crate::store::FragmentStore;

impl FragmentStore {
    /// Creates a store from YAML content, using the built-in animation kinds.
    ///
    /// The returned store is not sealed yet; more fragments may be registered.
    pub fn from_yaml(yaml: &str) -> Result<Self, StylesheetError> {
        let mut store = FragmentStore::new();
        store.load_yaml(yaml, &AnimationCatalog::with_builtins())?;
        Ok(store)
    }

    /// Creates a store from a YAML file, using the built-in animation kinds.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StylesheetError> {
        let mut store = FragmentStore::new();
        store.load_file(path, &AnimationCatalog::with_builtins())?;
        Ok(store)
    }

    /// Parses YAML content and registers every fragment it defines.
    ///
    /// Returns the number of fragments registered.
    pub fn load_yaml(
        &mut self,
        yaml: &str,
        catalog: &AnimationCatalog,
    ) -> Result<usize, StylesheetError> {
        let fragments = parse_stylesheet(yaml, catalog)?;
        let count = fragments.len();
        self.register_all(fragments)?;
        Ok(count)
    }

    /// Reads a YAML file and registers every fragment it defines.
    pub fn load_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        catalog: &AnimationCatalog,
    ) -> Result<usize, StylesheetError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| StylesheetError::Load {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;

        let count = self
            .load_yaml(&content, catalog)
            .map_err(|e| e.with_path(path))?;
        tracing::debug!(path = %path.display(), fragments = count, "loaded stylesheet");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StyleError;
    use crate::style::StyleValue;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "base:\n  color: red\nButton:\n  $include: base").unwrap();

        let store = FragmentStore::from_file(file.path()).unwrap();
        assert_eq!(store.len(), 2);

        let sealed = store.seal().unwrap();
        let resolution = sealed.resolve_tag("Button", Vec::<String>::new()).unwrap();
        assert_eq!(resolution.style["color"], StyleValue::from("red"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = FragmentStore::from_file("/nonexistent/rubicon.yaml").unwrap_err();
        assert!(matches!(err, StylesheetError::Load { .. }));
    }

    #[test]
    fn test_parse_error_carries_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Button: [unclosed").unwrap();

        let err = FragmentStore::from_file(file.path()).unwrap_err();
        match err {
            StylesheetError::Parse { path, .. } => assert_eq!(path.as_deref(), Some(file.path())),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_cycle_across_stylesheet_is_a_style_error() {
        let err = FragmentStore::from_yaml("a: { $include: b }\nb: { $include: a }").unwrap_err();
        assert!(matches!(
            err,
            StylesheetError::Style(StyleError::CyclicInclusion { .. })
        ));
    }

    #[test]
    fn test_load_accumulates_across_sources() {
        let mut store = FragmentStore::new();
        store.load_yaml("base: { flex: 1 }", &AnimationCatalog::new()).unwrap();
        store.load_yaml("Card: { $include: base }", &AnimationCatalog::new()).unwrap();

        let err = store
            .load_yaml("base: { flex: 2 }", &AnimationCatalog::new())
            .unwrap_err();
        assert!(matches!(
            err,
            StylesheetError::Style(StyleError::DuplicateFragment { .. })
        ));
    }
}
