//! The fragment store.
//!
//! Fragments are registered into a [`FragmentStore`], which checks every
//! registration against the inclusion graph, and then sealed into a
//! read-only [`SealedStore`] that resolutions run against.
//!
//! The store uses a two-phase approach:
//!
//! 1. **Registration**: a single writer adds fragments. Names must be unique
//!    and no registration may close an inclusion cycle. Inclusions may name
//!    fragments that are registered later.
//! 2. **Sealing**: every inclusion must now name a registered fragment. A
//!    store that fails this check is never sealed.
//!
//! A sealed store is immutable, `Send` and `Sync`: any number of threads may
//! resolve against it without coordination. Several independent stores can
//! live in one process.
//!
//! # Example
//!
//! ```rust
//! use rubicon_style::{FragmentStore, RuleNode, StyleError};
//!
//! let mut store = FragmentStore::new();
//! store.register("a", RuleNode::new().include("b")).unwrap();
//!
//! let err = store.register("b", RuleNode::new().include("a")).unwrap_err();
//! assert!(matches!(err, StyleError::CyclicInclusion { .. }));
//! ```

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::error::{Result, StyleError};
use crate::rule::RuleNode;

/// Default bound on nested inclusion expansion.
pub const DEFAULT_MAX_INCLUSION_DEPTH: usize = 64;

/// Store configuration.
///
/// Deserializes from any serde format; missing fields take their defaults.
///
/// ```rust
/// use rubicon_style::StoreConfig;
///
/// let config: StoreConfig = serde_json::from_str(r#"{ "max_inclusion_depth": 16 }"#).unwrap();
/// assert_eq!(config.max_inclusion_depth, 16);
///
/// let config: StoreConfig = serde_json::from_str("{}").unwrap();
/// assert_eq!(config, StoreConfig::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum nesting of inclusions followed while expanding one node.
    pub max_inclusion_depth: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_inclusion_depth: DEFAULT_MAX_INCLUSION_DEPTH,
        }
    }
}

/// Registration-phase fragment store.
#[derive(Debug, Clone, Default)]
pub struct FragmentStore {
    fragments: HashMap<String, RuleNode>,
    config: StoreConfig,
}

impl FragmentStore {
    /// Creates an empty store with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            fragments: HashMap::new(),
            config,
        }
    }

    /// Registers a fragment.
    ///
    /// # Errors
    ///
    /// - [`StyleError::DuplicateFragment`] if `name` is already registered
    /// - [`StyleError::CyclicInclusion`] if the node's inclusions (at any
    ///   nesting level) lead back to `name` through registered fragments
    pub fn register(&mut self, name: impl Into<String>, node: RuleNode) -> Result<()> {
        let name = name.into();
        if self.fragments.contains_key(&name) {
            return Err(StyleError::DuplicateFragment { name });
        }
        if let Some(cycle) = self.find_cycle(&name, &node) {
            return Err(StyleError::CyclicInclusion { cycle });
        }

        tracing::debug!(fragment = %name, includes = node.inclusions().len(), "registered fragment");
        self.fragments.insert(name, node);
        Ok(())
    }

    /// Registers several fragments in order, stopping at the first error.
    pub fn register_all<I, S>(&mut self, fragments: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, RuleNode)>,
        S: Into<String>,
    {
        for (name, node) in fragments {
            self.register(name, node)?;
        }
        Ok(())
    }

    /// Looks up a registered fragment.
    pub fn lookup(&self, name: &str) -> Result<&RuleNode> {
        lookup_in(&self.fragments, name)
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    /// Returns the number of registered fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Validates every inclusion and freezes the store.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::UnknownFragment`] for the first dangling
    /// inclusion, checking fragments in name order.
    pub fn seal(self) -> Result<SealedStore> {
        let mut names: Vec<&String> = self.fragments.keys().collect();
        names.sort();

        for name in names {
            let node = &self.fragments[name];
            let mut dangling = None;
            node.for_each_inclusion(&mut |included| {
                if dangling.is_none() && !self.fragments.contains_key(included) {
                    dangling = Some(included.to_string());
                }
            });
            if let Some(missing) = dangling {
                return Err(StyleError::UnknownFragment {
                    name: missing,
                    referenced_from: Some(name.clone()),
                });
            }
        }

        tracing::debug!(fragments = self.fragments.len(), "sealed fragment store");
        Ok(SealedStore {
            fragments: self.fragments,
            config: self.config,
        })
    }

    fn find_cycle(&self, name: &str, node: &RuleNode) -> Option<Vec<String>> {
        let mut path = vec![name.to_string()];
        let mut visited = HashSet::new();
        self.cycle_from(name, node, &mut path, &mut visited)
    }

    /// Depth-first search for a path from `node` back to `target`.
    fn cycle_from<'a>(
        &'a self,
        target: &str,
        node: &'a RuleNode,
        path: &mut Vec<String>,
        visited: &mut HashSet<&'a str>,
    ) -> Option<Vec<String>> {
        let mut included = Vec::new();
        node.for_each_inclusion(&mut |name| included.push(name));

        for name in included {
            if name == target {
                let mut cycle = path.clone();
                cycle.push(target.to_string());
                return Some(cycle);
            }
            if !visited.insert(name) {
                continue;
            }
            // Not registered yet: the edge is checked again when it is.
            let Some(next) = self.fragments.get(name) else {
                continue;
            };
            path.push(name.to_string());
            if let Some(cycle) = self.cycle_from(target, next, path, visited) {
                return Some(cycle);
            }
            path.pop();
        }
        None
    }
}

/// A sealed, read-only fragment store.
///
/// Obtained from [`FragmentStore::seal`]. Resolution entry points live in
/// [`crate::resolve`].
#[derive(Debug, Clone)]
pub struct SealedStore {
    fragments: HashMap<String, RuleNode>,
    config: StoreConfig,
}

impl SealedStore {
    /// Looks up a fragment.
    pub fn lookup(&self, name: &str) -> Result<&RuleNode> {
        lookup_in(&self.fragments, name)
    }

    /// Returns the fragment, or `None` if absent.
    pub fn get(&self, name: &str) -> Option<&RuleNode> {
        self.fragments.get(name)
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    /// Returns the stored name alongside the fragment, borrowed from the store.
    pub(crate) fn entry(&self, name: &str) -> Option<(&str, &RuleNode)> {
        self.fragments
            .get_key_value(name)
            .map(|(key, node)| (key.as_str(), node))
    }

    /// Returns the number of fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns true if the store holds no fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Returns the fragment names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fragments.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

fn lookup_in<'a>(fragments: &'a HashMap<String, RuleNode>, name: &str) -> Result<&'a RuleNode> {
    fragments.get(name).ok_or_else(|| StyleError::UnknownFragment {
        name: name.to_string(),
        referenced_from: None,
    })
}
