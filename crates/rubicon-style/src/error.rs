//! Error types for fragment registration and style resolution.
//!
//! This module provides [`StyleError`], the error type for every store and
//! resolution operation. Shape conflicts during merging are deliberately not
//! represented here: the merge engine resolves them deterministically (see
//! [`crate::style::merge`]).

use thiserror::Error;

/// Errors raised while building a fragment store or resolving against it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// An inclusion or lookup references a fragment that was never registered.
    #[error("{}", unknown_fragment_message(.name, .referenced_from.as_deref()))]
    UnknownFragment {
        /// The missing fragment name.
        name: String,
        /// The fragment whose inclusion list referenced `name`, if any.
        referenced_from: Option<String>,
    },

    /// A fragment name was registered twice.
    #[error("fragment '{name}' is already registered")]
    DuplicateFragment {
        /// The colliding fragment name.
        name: String,
    },

    /// Registering a fragment would close a cycle in the inclusion graph.
    #[error("cyclic inclusion detected: {}", .cycle.join(" -> "))]
    CyclicInclusion {
        /// The fragment names along the cycle; first and last entries are equal.
        cycle: Vec<String>,
    },

    /// Expansion nested deeper than the configured bound.
    ///
    /// A sealed store is acyclic, so hitting this signals a store-integrity bug
    /// or a depth limit configured below the real nesting of the rule data.
    #[error("inclusion depth exceeded {limit} while expanding '{name}'")]
    InclusionDepthExceeded {
        /// The fragment being expanded when the bound was hit.
        name: String,
        /// The configured maximum depth.
        limit: usize,
    },
}

fn unknown_fragment_message(name: &str, referenced_from: Option<&str>) -> String {
    match referenced_from {
        Some(from) => format!("fragment '{}' includes unknown fragment '{}'", from, name),
        None => format!("unknown fragment '{}'", name),
    }
}

/// Result type for store and resolution operations.
pub type Result<T> = std::result::Result<T, StyleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fragment_display() {
        let err = StyleError::UnknownFragment {
            name: "missing".to_string(),
            referenced_from: Some("button".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("button"));
        assert!(msg.contains("missing"));

        let bare = StyleError::UnknownFragment {
            name: "missing".to_string(),
            referenced_from: None,
        };
        assert_eq!(bare.to_string(), "unknown fragment 'missing'");
    }

    #[test]
    fn test_cyclic_inclusion_display() {
        let err = StyleError::CyclicInclusion {
            cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("cyclic"));
        assert!(msg.contains("a -> b -> a"));
    }

    #[test]
    fn test_depth_exceeded_display() {
        let err = StyleError::InclusionDepthExceeded {
            name: "deep".to_string(),
            limit: 64,
        };
        assert!(err.to_string().contains("64"));
    }
}
