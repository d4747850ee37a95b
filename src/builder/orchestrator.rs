//! Configure -> build -> install sequencing against a staging layout.
//!
//! Each phase consumes the previous phase's result, so phases cannot be
//! skipped or reordered:
//!
//! ```text
//! configure(defs, layout, archive) -> ConfiguredBuild
//! build(ConfiguredBuild)           -> BuiltTree
//! install(BuiltTree)               -> InstalledPackage
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::definitions::{BuildDefinitions, INSTALL_PREFIX_KEY};
use crate::builder::extract::extract_archive;
use crate::core::errors::{Phase, RecipeError};
use crate::sources::verify::VerifiedArchive;
use crate::util::fs::{recreate_dir, remove_dir_all_if_exists, tree_fingerprint, write_bytes};

/// Recipe-provided CMake project for the amalgamation.
pub const CMAKE_LISTS: &str = include_str!("../../recipe/CMakeLists.txt");

/// Companion find-module shipped next to the installed library.
pub const FIND_MODULE: &str = include_str!("../../recipe/FindSQLite3.cmake");

/// File name of [`FIND_MODULE`] in the install prefix.
pub const FIND_MODULE_NAME: &str = "FindSQLite3.cmake";

/// External build tool. Each call blocks until the phase finishes; only
/// success or failure is observed.
pub trait BuildTool {
    fn name(&self) -> &str;

    fn configure(
        &self,
        source_dir: &Path,
        build_dir: &Path,
        definitions: &BuildDefinitions,
    ) -> Result<()>;

    fn build(&self, build_dir: &Path) -> Result<()>;

    fn install(&self, build_dir: &Path) -> Result<()>;
}

/// Directories owned by one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingLayout {
    pub build_dir: PathBuf,
    pub install_prefix: PathBuf,
}

impl StagingLayout {
    /// Layout rooted at `root`: `root/build` and `root/package`.
    pub fn new(root: &Path) -> Self {
        StagingLayout {
            build_dir: root.join("build"),
            install_prefix: root.join("package"),
        }
    }

    /// Layout for one package id under a shared staging root.
    pub fn for_package(staging_root: &Path, package_id: &str) -> Self {
        Self::new(&staging_root.join(package_id))
    }

    /// Extracted amalgamation plus recipe files.
    pub fn source_dir(&self) -> PathBuf {
        self.build_dir.join("source")
    }

    /// CMake binary directory.
    pub fn cmake_dir(&self) -> PathBuf {
        self.build_dir.join("cmake")
    }

    /// Discard anything left by an earlier, possibly aborted, invocation.
    pub fn reset(&self) -> Result<(), RecipeError> {
        recreate_dir(&self.build_dir).map_err(RecipeError::Staging)?;
        remove_dir_all_if_exists(&self.install_prefix).map_err(RecipeError::Staging)
    }
}

/// A configured build tree.
#[derive(Debug, Clone)]
pub struct ConfiguredBuild {
    layout: StagingLayout,
    definitions: BuildDefinitions,
    source_fingerprint: String,
}

impl ConfiguredBuild {
    pub fn layout(&self) -> &StagingLayout {
        &self.layout
    }

    /// Definitions passed to the build tool, install prefix included.
    pub fn definitions(&self) -> &BuildDefinitions {
        &self.definitions
    }

    /// Fingerprint of the extracted source tree.
    pub fn source_fingerprint(&self) -> &str {
        &self.source_fingerprint
    }
}

/// A build tree whose build phase succeeded.
#[derive(Debug, Clone)]
pub struct BuiltTree {
    configured: ConfiguredBuild,
}

impl BuiltTree {
    pub fn configured(&self) -> &ConfiguredBuild {
        &self.configured
    }
}

/// Result of a successful install.
#[derive(Debug, Clone)]
pub struct InstalledPackage {
    pub layout: StagingLayout,
    pub definitions: BuildDefinitions,
}

impl InstalledPackage {
    pub fn install_prefix(&self) -> &Path {
        &self.layout.install_prefix
    }
}

/// Sequences the build tool's phases.
pub struct BuildOrchestrator<'a> {
    tool: &'a dyn BuildTool,
}

impl<'a> BuildOrchestrator<'a> {
    pub fn new(tool: &'a dyn BuildTool) -> Self {
        BuildOrchestrator { tool }
    }

    /// Re-extract `archive` into a fresh build directory and configure it.
    ///
    /// The build directory is wiped first every time, so repeated calls with
    /// the same inputs produce the same tree.
    pub fn configure(
        &self,
        definitions: &BuildDefinitions,
        layout: &StagingLayout,
        archive: &VerifiedArchive,
    ) -> Result<ConfiguredBuild, RecipeError> {
        tracing::info!(
            "Extracting {} into {}",
            archive.reference().identifier,
            layout.build_dir.display()
        );

        recreate_dir(&layout.build_dir).map_err(RecipeError::Staging)?;

        let source_dir = layout.source_dir();
        extract_archive(archive, &source_dir)?;
        write_bytes(&source_dir.join("CMakeLists.txt"), CMAKE_LISTS.as_bytes())
            .map_err(RecipeError::Staging)?;

        let source_fingerprint = tree_fingerprint(&source_dir).map_err(RecipeError::Staging)?;

        let definitions = definitions.clone().with(
            INSTALL_PREFIX_KEY,
            layout.install_prefix.display().to_string(),
        );

        self.tool
            .configure(&source_dir, &layout.cmake_dir(), &definitions)
            .map_err(|e| tool_failure(Phase::Configure, e))?;

        Ok(ConfiguredBuild {
            layout: layout.clone(),
            definitions,
            source_fingerprint,
        })
    }

    pub fn build(&self, configured: ConfiguredBuild) -> Result<BuiltTree, RecipeError> {
        self.tool
            .build(&configured.layout.cmake_dir())
            .map_err(|e| tool_failure(Phase::Build, e))?;

        Ok(BuiltTree { configured })
    }

    /// Install into a fresh prefix. On failure the prefix is removed so a
    /// partial install is never published.
    pub fn install(&self, built: BuiltTree) -> Result<InstalledPackage, RecipeError> {
        let ConfiguredBuild {
            layout,
            definitions,
            ..
        } = built.configured;

        recreate_dir(&layout.install_prefix).map_err(RecipeError::Staging)?;

        let result = write_bytes(
            &layout.install_prefix.join(FIND_MODULE_NAME),
            FIND_MODULE.as_bytes(),
        )
        .map_err(RecipeError::Staging)
        .and_then(|()| {
            self.tool
                .install(&layout.cmake_dir())
                .map_err(|e| tool_failure(Phase::Install, e))
        });

        if let Err(err) = result {
            if let Err(cleanup) = remove_dir_all_if_exists(&layout.install_prefix) {
                tracing::warn!("failed to discard partial install: {:#}", cleanup);
            }
            return Err(err);
        }

        Ok(InstalledPackage {
            layout,
            definitions,
        })
    }
}

fn tool_failure(phase: Phase, err: anyhow::Error) -> RecipeError {
    RecipeError::BuildToolFailure {
        phase,
        message: format!("{:#}", err),
    }
}
