//! Test utilities and mocks for unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::test_support::{amalgamation_zip, verified, RecordingTool};
//!
//! let archive = verified(amalgamation_zip("sqlite-amalgamation-3280000"));
//! let tool = RecordingTool::new();
//! let orchestrator = BuildOrchestrator::new(&tool);
//! ```

pub mod fixtures;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};

use crate::builder::definitions::{BuildDefinitions, INSTALL_PREFIX_KEY};
use crate::builder::orchestrator::BuildTool;
use crate::sources::archive::CandidateSource;
use crate::sources::fetch::Fetcher;

pub use fixtures::*;

/// Fetcher with scripted responses. Unscripted sources are unreachable.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: HashMap<String, Vec<u8>>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` for `source`.
    pub fn respond(mut self, source: &CandidateSource, bytes: Vec<u8>) -> Self {
        self.responses.insert(source.to_string(), bytes);
        self
    }

    /// Sources requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch(&self, source: &CandidateSource) -> Result<Vec<u8>> {
        let key = source.to_string();
        self.calls.lock().unwrap().push(key.clone());
        self.responses
            .get(&key)
            .cloned()
            .ok_or_else(|| anyhow!("connection refused: {}", key))
    }
}

/// A build phase as seen by [`RecordingTool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCall {
    Configure,
    Build,
    Install,
}

/// Build tool that records calls instead of running CMake.
///
/// `install` writes a placeholder static library under the configured
/// install prefix so callers can inspect the result.
#[derive(Debug, Default)]
pub struct RecordingTool {
    calls: Mutex<Vec<ToolCall>>,
    definitions: Mutex<Option<BuildDefinitions>>,
    fail_on: Option<ToolCall>,
}

impl RecordingTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `phase` fail.
    pub fn fail_on(mut self, phase: ToolCall) -> Self {
        self.fail_on = Some(phase);
        self
    }

    pub fn phases(&self) -> Vec<ToolCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Definitions received by the most recent configure call.
    pub fn configured_definitions(&self) -> Option<BuildDefinitions> {
        self.definitions.lock().unwrap().clone()
    }

    fn record(&self, call: ToolCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail_on == Some(call) {
            bail!("{:?} exited with status 1", call);
        }
        Ok(())
    }
}

impl BuildTool for RecordingTool {
    fn name(&self) -> &str {
        "recording"
    }

    fn configure(
        &self,
        _source_dir: &Path,
        _build_dir: &Path,
        definitions: &BuildDefinitions,
    ) -> Result<()> {
        *self.definitions.lock().unwrap() = Some(definitions.clone());
        self.record(ToolCall::Configure)
    }

    fn build(&self, _build_dir: &Path) -> Result<()> {
        self.record(ToolCall::Build)
    }

    fn install(&self, _build_dir: &Path) -> Result<()> {
        self.record(ToolCall::Install)?;

        let prefix = self
            .configured_definitions()
            .and_then(|defs| defs.get(INSTALL_PREFIX_KEY).map(|v| v.to_string()))
            .ok_or_else(|| anyhow!("install without configure"))?;
        let lib_dir = Path::new(&prefix).join("lib");
        std::fs::create_dir_all(&lib_dir)?;
        std::fs::write(lib_dir.join("libsqlite3.a"), b"!<arch>\n")?;
        Ok(())
    }
}
