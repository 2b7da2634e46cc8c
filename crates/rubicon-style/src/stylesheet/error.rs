//! Error types for stylesheet loading.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::StyleError;

/// Error type for stylesheet parsing and loading failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StylesheetError {
    /// YAML parse error, including duplicate mapping keys.
    #[error("{}", parse_message(.path.as_deref(), .message))]
    Parse {
        /// Optional source file path.
        path: Option<PathBuf>,
        /// Error message from the YAML parser.
        message: String,
    },

    /// A fragment is structurally invalid.
    #[error("invalid definition for fragment '{fragment}': {message}")]
    InvalidDefinition {
        /// Top-level fragment where the error occurred.
        fragment: String,
        /// Description of what was wrong.
        message: String,
    },

    /// An animation names a kind the catalog does not know.
    #[error("animation '{animation}' in fragment '{fragment}' uses unknown kind '{kind}'")]
    UnknownAnimationKind {
        /// Top-level fragment where the animation is declared.
        fragment: String,
        /// The animation name.
        animation: String,
        /// The unknown kind.
        kind: String,
    },

    /// The stylesheet file could not be read.
    #[error("failed to load stylesheet: {message}")]
    Load {
        /// Error message.
        message: String,
    },

    /// Registering or sealing the parsed fragments failed.
    #[error(transparent)]
    Style(#[from] StyleError),
}

impl StylesheetError {
    /// Attaches a source path to parse errors.
    pub(crate) fn with_path(self, path: &Path) -> Self {
        match self {
            StylesheetError::Parse { message, .. } => StylesheetError::Parse {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        }
    }
}

fn parse_message(path: Option<&Path>, message: &str) -> String {
    match path {
        Some(p) => format!("failed to parse stylesheet {}: {}", p.display(), message),
        None => format!("failed to parse stylesheet: {}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_with_path() {
        let err = StylesheetError::Parse {
            path: None,
            message: "bad indent".to_string(),
        }
        .with_path(Path::new("theme.yaml"));
        assert_eq!(
            err.to_string(),
            "failed to parse stylesheet theme.yaml: bad indent"
        );
    }

    #[test]
    fn test_style_error_is_transparent() {
        let err: StylesheetError = StyleError::DuplicateFragment {
            name: "base".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "fragment 'base' is already registered");
    }
}
