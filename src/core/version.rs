//! Pinned upstream version.

use std::fmt;
use std::str::FromStr;

use crate::core::errors::RecipeError;

/// Largest minor/patch component that still fits the two-digit archive slot.
pub const MAX_TWO_DIGIT_COMPONENT: u64 = 99;

/// An upstream `MAJOR.MINOR.PATCH` version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionSpec {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl VersionSpec {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        VersionSpec {
            major,
            minor,
            patch,
        }
    }

    /// Parse a dotted version string.
    ///
    /// Exactly three unsigned decimal components are accepted; leading zeros
    /// are fine (`3.08.0`). Suffixes such as `-beta` are rejected, as are
    /// minor/patch components that do not fit the two-digit slots of the
    /// archive identifier.
    pub fn parse(version: &str) -> Result<Self, RecipeError> {
        let malformed = |reason: String| RecipeError::MalformedVersion {
            version: version.to_string(),
            reason,
        };

        let parts: Vec<&str> = version.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(malformed(format!(
                "expected 3 dot-separated components, found {}",
                parts.len()
            )));
        }

        let mut components = [0u64; 3];
        for (slot, part) in components.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed(format!("`{}` is not a non-negative integer", part)));
            }
            *slot = part
                .parse()
                .map_err(|e| malformed(format!("`{}`: {}", part, e)))?;
        }
        let [major, minor, patch] = components;

        for (name, value) in [("minor", minor), ("patch", patch)] {
            if value > MAX_TWO_DIGIT_COMPONENT {
                return Err(malformed(format!(
                    "{} component {} does not fit in two digits",
                    name, value
                )));
            }
        }

        Ok(VersionSpec::new(major, minor, patch))
    }
}

impl FromStr for VersionSpec {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionSpec::parse(s)
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
