//! Recipe error types.
//!
//! Every variant is fatal for the invocation. There is no retry and no
//! partial-state recovery inside the core.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for recipe operations.
pub type Result<T, E = RecipeError> = std::result::Result<T, E>;

/// Build phase reported by [`RecipeError::BuildToolFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configure,
    Build,
    Install,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Configure => write!(f, "configure"),
            Phase::Build => write!(f, "build"),
            Phase::Install => write!(f, "install"),
        }
    }
}

/// Error raised by any stage of the recipe.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("malformed version `{version}`: {reason}")]
    MalformedVersion { version: String, reason: String },

    #[error("no candidate source for `{identifier}` could be reached")]
    SourceUnreachable {
        identifier: String,
        /// (source, failure) for every candidate tried, in order
        attempts: Vec<(String, String)>,
    },

    #[error("digest mismatch for `{identifier}`:\n  expected: {expected}\n  actual:   {actual}")]
    DigestMismatch {
        identifier: String,
        expected: String,
        actual: String,
    },

    #[error("build tool failed during {phase}: {message}")]
    BuildToolFailure { phase: Phase, message: String },

    #[error("invalid option `{name}`: {reason}")]
    InvalidOption { name: String, reason: String },

    #[error("invalid mirror `{mirror}`: {reason}")]
    InvalidMirror { mirror: String, reason: String },

    #[error("failed to extract archive into {}: {message}", dest.display())]
    Extract { dest: PathBuf, message: String },

    #[error("staging failed: {0:#}")]
    Staging(anyhow::Error),
}

impl RecipeError {
    /// Short hint printed after the error by the CLI.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            RecipeError::MalformedVersion { .. } => {
                Some("help: versions must look like `MAJOR.MINOR.PATCH`, e.g. `3.28.0`")
            }
            RecipeError::SourceUnreachable { .. } => Some(
                "help: check your network connection or place the archive in the vendor directory",
            ),
            RecipeError::DigestMismatch { .. } => {
                Some("help: the archive is corrupt or not the pinned release; remove it and retry")
            }
            RecipeError::BuildToolFailure { .. } => {
                Some("help: re-run with `--verbose` to see the CMake command lines")
            }
            RecipeError::InvalidOption { .. } => {
                Some("help: run `sqlite-recipe definitions --help` for the recognized options")
            }
            RecipeError::InvalidMirror { .. } => {
                Some("help: `[source] mirror` must be an http(s) base URL")
            }
            RecipeError::Extract { .. } | RecipeError::Staging(_) => None,
        }
    }
}
