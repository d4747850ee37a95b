//! Archive resolution: version -> amalgamation archive reference.
//!
//! The archive name is derived from the version alone:
//!
//! ```text
//! 3.28.0  ->  sqlite-amalgamation-3280000.zip
//!             ^^^^^^^^^^^^^^^^^^^^ major, minor:02, patch:02, "00", ".zip"
//! ```
//!
//! Candidates are tried in a fixed order: the offline vendor cache first,
//! then the HTTPS mirror, which files releases under the year they shipped.

use std::fmt;

use url::Url;

use crate::core::errors::RecipeError;
use crate::core::version::VersionSpec;

/// Version this recipe is pinned to.
pub const PINNED_VERSION: &str = "3.28.0";

/// SHA-256 of `sqlite-amalgamation-3280000.zip`.
pub const PINNED_SHA256: &str = "d02fc4e95cfef672b45052e221617a050b7f2e20103661cda88387349a9b1327";

/// Release year of the pinned version; the mirror groups archives by year.
pub const PINNED_RELEASE_YEAR: u16 = 2019;

/// Default download mirror.
pub const DEFAULT_MIRROR: &str = "https://www.sqlite.org/";

/// Namespace of the archive inside the vendor cache.
pub const VENDOR_NAMESPACE: &str = "sqlite/sqlite3";

const ARCHIVE_PREFIX: &str = "sqlite-amalgamation-";
const ARCHIVE_EXTENSION: &str = ".zip";

/// One place the archive can be retrieved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSource {
    /// Local/offline cache, addressed relative to the vendor root.
    Vendor { path: String },
    /// Remote mirror.
    Remote(Url),
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateSource::Vendor { path } => write!(f, "vendor://{}", path),
            CandidateSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// Everything needed to fetch and check one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReference {
    pub version: VersionSpec,
    /// File name of the archive, e.g. `sqlite-amalgamation-3280000.zip`
    pub identifier: String,
    /// Non-empty, most preferred first
    pub candidate_sources: Vec<CandidateSource>,
    /// Lowercase hex SHA-256
    pub expected_digest: String,
}

impl ArchiveReference {
    /// Archive name without the extension; also the top-level directory
    /// inside the archive.
    pub fn stem(&self) -> &str {
        self.identifier
            .strip_suffix(ARCHIVE_EXTENSION)
            .unwrap_or(&self.identifier)
    }
}

/// Archive identifier for `version`.
pub fn archive_identifier(version: &VersionSpec) -> String {
    format!(
        "{}{}{:02}{:02}00{}",
        ARCHIVE_PREFIX, version.major, version.minor, version.patch, ARCHIVE_EXTENSION
    )
}

/// Maps a version string onto an [`ArchiveReference`].
#[derive(Debug, Clone)]
pub struct ArchiveResolver {
    mirror: Url,
    release_year: u16,
    expected_digest: String,
}

impl ArchiveResolver {
    /// Create a resolver for a specific mirror, release year and digest.
    pub fn new(
        mirror: &str,
        release_year: u16,
        expected_digest: impl Into<String>,
    ) -> Result<Self, RecipeError> {
        let invalid = |reason: String| RecipeError::InvalidMirror {
            mirror: mirror.to_string(),
            reason,
        };

        let mut mirror_url = Url::parse(mirror).map_err(|e| invalid(e.to_string()))?;
        if mirror_url.cannot_be_a_base() || !matches!(mirror_url.scheme(), "https" | "http") {
            return Err(invalid("expected an http(s) base URL".to_string()));
        }
        // `join` replaces the last segment unless the base ends in a slash.
        if !mirror_url.path().ends_with('/') {
            let path = format!("{}/", mirror_url.path());
            mirror_url.set_path(&path);
        }

        Ok(ArchiveResolver {
            mirror: mirror_url,
            release_year,
            expected_digest: expected_digest.into().to_ascii_lowercase(),
        })
    }

    /// Resolver for the pinned release on the default mirror.
    pub fn pinned() -> Self {
        ArchiveResolver {
            mirror: Url::parse(DEFAULT_MIRROR).expect("default mirror is a valid URL"),
            release_year: PINNED_RELEASE_YEAR,
            expected_digest: PINNED_SHA256.to_string(),
        }
    }

    pub fn mirror(&self) -> &Url {
        &self.mirror
    }

    /// Resolve `version` into an archive reference. Pure; touches neither
    /// network nor disk.
    pub fn resolve(&self, version: &str) -> Result<ArchiveReference, RecipeError> {
        let version = VersionSpec::parse(version)?;
        self.resolve_spec(version)
    }

    /// Resolve an already parsed version.
    pub fn resolve_spec(&self, version: VersionSpec) -> Result<ArchiveReference, RecipeError> {
        let identifier = archive_identifier(&version);

        let remote = self
            .mirror
            .join(&format!("{}/{}", self.release_year, identifier))
            .map_err(|e| RecipeError::InvalidMirror {
                mirror: self.mirror.to_string(),
                reason: e.to_string(),
            })?;

        let candidate_sources = vec![
            CandidateSource::Vendor {
                path: format!("{}/{}", VENDOR_NAMESPACE, identifier),
            },
            CandidateSource::Remote(remote),
        ];

        Ok(ArchiveReference {
            version,
            identifier,
            candidate_sources,
            expected_digest: self.expected_digest.clone(),
        })
    }
}

impl Default for ArchiveResolver {
    fn default() -> Self {
        ArchiveResolver::pinned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_identifier() {
        let reference = ArchiveResolver::pinned().resolve(PINNED_VERSION).unwrap();
        assert_eq!(reference.identifier, "sqlite-amalgamation-3280000.zip");
        assert_eq!(reference.stem(), "sqlite-amalgamation-3280000");
        assert_eq!(reference.expected_digest, PINNED_SHA256);
    }

    #[test]
    fn test_identifier_zero_pads_minor_and_patch() {
        let cases = [
            (VersionSpec::new(3, 8, 1), "sqlite-amalgamation-3080100.zip"),
            (VersionSpec::new(3, 45, 12), "sqlite-amalgamation-3451200.zip"),
            (VersionSpec::new(3, 0, 0), "sqlite-amalgamation-3000000.zip"),
            (VersionSpec::new(3, 99, 99), "sqlite-amalgamation-3999900.zip"),
        ];
        for (version, expected) in cases {
            assert_eq!(archive_identifier(&version), expected);
        }

        for minor in 0..=99 {
            for patch in [0, 9, 10, 99] {
                let id = archive_identifier(&VersionSpec::new(3, minor, patch));
                assert_eq!(id, format!("sqlite-amalgamation-3{:02}{:02}00.zip", minor, patch));
                assert_eq!(id.len(), "sqlite-amalgamation-3000000.zip".len());
            }
        }
    }

    #[test]
    fn test_resolve_zero_padded_input() {
        let resolver = ArchiveResolver::pinned();
        assert_eq!(
            resolver.resolve("3.08.0").unwrap().identifier,
            "sqlite-amalgamation-3080000.zip"
        );
        assert_eq!(
            resolver.resolve("03.28.00").unwrap().identifier,
            "sqlite-amalgamation-3280000.zip"
        );
    }

    #[test]
    fn test_candidate_order() {
        let reference = ArchiveResolver::pinned().resolve("3.28.0").unwrap();
        let sources: Vec<String> = reference
            .candidate_sources
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            sources,
            vec![
                "vendor://sqlite/sqlite3/sqlite-amalgamation-3280000.zip".to_string(),
                "https://www.sqlite.org/2019/sqlite-amalgamation-3280000.zip".to_string(),
            ]
        );
    }

    #[test]
    fn test_mirror_without_trailing_slash() {
        let resolver =
            ArchiveResolver::new("https://mirror.example.com/sqlite", 2019, "AB").unwrap();
        let reference = resolver.resolve("3.28.0").unwrap();
        assert_eq!(
            reference.candidate_sources[1].to_string(),
            "https://mirror.example.com/sqlite/2019/sqlite-amalgamation-3280000.zip"
        );
        assert_eq!(reference.expected_digest, "ab");
    }

    #[test]
    fn test_invalid_mirror() {
        assert!(ArchiveResolver::new("not a url", 2019, PINNED_SHA256).is_err());
        assert!(ArchiveResolver::new("ftp://example.com/", 2019, PINNED_SHA256).is_err());
    }

    #[test]
    fn test_malformed_version() {
        let err = ArchiveResolver::pinned().resolve("3.28").unwrap_err();
        assert!(matches!(err, RecipeError::MalformedVersion { .. }));
    }
}
