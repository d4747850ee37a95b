//! Content verification of retrieved archives.

use std::fmt;

use crate::core::errors::RecipeError;
use crate::sources::archive::ArchiveReference;
use crate::util::hash::{digests_equal, sha256_bytes};

/// The bytes did not hash to the expected digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestMismatch {
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for DigestMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected sha256 {}, got {}", self.expected, self.actual)
    }
}

impl std::error::Error for DigestMismatch {}

/// Hash all of `bytes` and compare against `expected_digest`.
pub fn verify(bytes: &[u8], expected_digest: &str) -> Result<(), DigestMismatch> {
    let actual = sha256_bytes(bytes);
    if digests_equal(expected_digest, &actual) {
        Ok(())
    } else {
        Err(DigestMismatch {
            expected: expected_digest.to_string(),
            actual,
        })
    }
}

/// Archive bytes that passed verification.
///
/// This is the only input extraction accepts, so unverified bytes can never
/// reach the staging directory.
#[derive(Clone)]
pub struct VerifiedArchive {
    reference: ArchiveReference,
    bytes: Vec<u8>,
}

impl VerifiedArchive {
    /// Verify `bytes` against `reference`, taking ownership on success.
    pub fn new(reference: ArchiveReference, bytes: Vec<u8>) -> Result<Self, RecipeError> {
        match verify(&bytes, &reference.expected_digest) {
            Ok(()) => {
                tracing::debug!(
                    "verified {} ({} bytes, sha256 {})",
                    reference.identifier,
                    bytes.len(),
                    &reference.expected_digest[..reference.expected_digest.len().min(16)]
                );
                Ok(VerifiedArchive { reference, bytes })
            }
            Err(mismatch) => Err(RecipeError::DigestMismatch {
                identifier: reference.identifier,
                expected: mismatch.expected,
                actual: mismatch.actual,
            }),
        }
    }

    pub fn reference(&self) -> &ArchiveReference {
        &self.reference
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for VerifiedArchive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifiedArchive")
            .field("identifier", &self.reference.identifier)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::archive::ArchiveResolver;

    fn reference_for(bytes: &[u8]) -> ArchiveReference {
        ArchiveResolver::new("https://www.sqlite.org/", 2019, sha256_bytes(bytes))
            .unwrap()
            .resolve("3.28.0")
            .unwrap()
    }

    #[test]
    fn test_verify_accepts_matching_bytes() {
        let data = b"amalgamation".to_vec();
        assert!(verify(&data, &sha256_bytes(&data)).is_ok());
        assert!(VerifiedArchive::new(reference_for(&data), data).is_ok());
    }

    #[test]
    fn test_any_single_byte_change_is_rejected() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1024).collect();
        let reference = reference_for(&data);

        for index in [0, 1, 511, 1023] {
            let mut tampered = data.clone();
            tampered[index] ^= 0x01;
            let err = VerifiedArchive::new(reference.clone(), tampered).unwrap_err();
            assert!(matches!(err, RecipeError::DigestMismatch { .. }));
        }
    }

    #[test]
    fn test_truncation_is_rejected() {
        let data = vec![1u8; 64];
        let reference = reference_for(&data);
        assert!(VerifiedArchive::new(reference, data[..63].to_vec()).is_err());
    }

    #[test]
    fn test_malformed_expected_digest_fails_closed() {
        assert!(verify(b"x", "not-a-digest").is_err());
        assert!(verify(b"x", "").is_err());
    }
}
