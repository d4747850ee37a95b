//! Archive retrieval with ordered fallback.
//!
//! A [`Fetcher`] turns one [`CandidateSource`] into bytes. Any error from a
//! fetcher means "this candidate is unreachable" and the next candidate is
//! tried. Bytes that come back but fail verification stop the whole fetch.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::core::errors::RecipeError;
use crate::sources::archive::{ArchiveReference, CandidateSource};
use crate::sources::verify::VerifiedArchive;

/// Retrieves raw archive bytes from a single candidate source.
pub trait Fetcher {
    /// Fetcher name for logs.
    fn name(&self) -> &str;

    /// Retrieve the bytes behind `source`. An error marks it unreachable.
    fn fetch(&self, source: &CandidateSource) -> Result<Vec<u8>>;
}

/// Reads `vendor://` references from a local directory tree.
#[derive(Debug, Clone)]
pub struct VendorFetcher {
    root: PathBuf,
}

impl VendorFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        VendorFetcher { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Fetcher for VendorFetcher {
    fn name(&self) -> &str {
        "vendor"
    }

    fn fetch(&self, source: &CandidateSource) -> Result<Vec<u8>> {
        let CandidateSource::Vendor { path } = source else {
            bail!("vendor fetcher cannot retrieve `{}`", source);
        };

        let file = self.root.join(path);
        if !file.is_file() {
            bail!("{} is not in the vendor cache", file.display());
        }

        std::fs::read(&file).with_context(|| format!("failed to read {}", file.display()))
    }
}

/// Downloads remote candidates over HTTP(S).
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(concat!("sqlite-recipe/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("failed to build HTTP client")?;
        Ok(HttpFetcher { client })
    }
}

impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, source: &CandidateSource) -> Result<Vec<u8>> {
        let CandidateSource::Remote(url) = source else {
            bail!("http fetcher cannot retrieve `{}`", source);
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("failed to download {}", url))?;

        if !response.status().is_success() {
            bail!("failed to download {}: HTTP {}", url, response.status());
        }

        let bytes = response
            .bytes()
            .with_context(|| format!("failed to read response body from {}", url))?;

        Ok(bytes.to_vec())
    }
}

/// Dispatches each candidate to the vendor cache or the network.
pub struct DefaultFetcher {
    vendor: VendorFetcher,
    http: HttpFetcher,
}

impl DefaultFetcher {
    pub fn new(vendor: VendorFetcher, http: HttpFetcher) -> Self {
        DefaultFetcher { vendor, http }
    }
}

impl Fetcher for DefaultFetcher {
    fn name(&self) -> &str {
        "default"
    }

    fn fetch(&self, source: &CandidateSource) -> Result<Vec<u8>> {
        match source {
            CandidateSource::Vendor { .. } => self.vendor.fetch(source),
            CandidateSource::Remote(_) => self.http.fetch(source),
        }
    }
}

/// Walk the candidate sources in order and return the first archive that
/// can be retrieved, verified against the expected digest.
///
/// Unreachable candidates are skipped. A digest mismatch is returned
/// immediately without trying later candidates.
pub fn fetch_verified(
    reference: &ArchiveReference,
    fetcher: &dyn Fetcher,
) -> Result<VerifiedArchive, RecipeError> {
    let mut attempts = Vec::new();

    for source in &reference.candidate_sources {
        tracing::debug!("trying {} via {} fetcher", source, fetcher.name());

        match fetcher.fetch(source) {
            Ok(bytes) => {
                tracing::info!("Retrieved {} from {}", reference.identifier, source);
                return VerifiedArchive::new(reference.clone(), bytes);
            }
            Err(e) => {
                tracing::warn!("{} unreachable: {:#}", source, e);
                attempts.push((source.to_string(), format!("{:#}", e)));
            }
        }
    }

    Err(RecipeError::SourceUnreachable {
        identifier: reference.identifier.clone(),
        attempts,
    })
}
