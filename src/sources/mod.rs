//! Source acquisition: archive naming, retrieval and verification.

pub mod archive;
pub mod fetch;
pub mod verify;

pub use archive::{archive_identifier, ArchiveReference, ArchiveResolver, CandidateSource};
pub use fetch::{fetch_verified, DefaultFetcher, Fetcher, HttpFetcher, VendorFetcher};
pub use verify::{verify, DigestMismatch, VerifiedArchive};
