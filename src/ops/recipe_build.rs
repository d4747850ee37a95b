//! End-to-end recipe invocation: resolve, fetch, verify, build, publish.

use std::path::Path;

use crate::builder::definitions::{map_options, BuildDefinitions};
use crate::builder::orchestrator::{BuildOrchestrator, BuildTool, InstalledPackage, StagingLayout};
use crate::core::errors::RecipeError;
use crate::core::options::{OptionOverrides, PackageOptions};
use crate::core::settings::Settings;
use crate::ops::package_info::{publish, LinkMetadata};
use crate::sources::archive::{ArchiveReference, ArchiveResolver, PINNED_VERSION};
use crate::sources::fetch::{fetch_verified, Fetcher};
use crate::util::fs::remove_dir_all_if_exists;

/// Fixed inputs of one invocation.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub version: String,
    pub resolver: ArchiveResolver,
    pub settings: Settings,
    pub overrides: OptionOverrides,
}

impl Recipe {
    /// The pinned release with default options.
    pub fn pinned(settings: Settings) -> Self {
        Recipe {
            version: PINNED_VERSION.to_string(),
            resolver: ArchiveResolver::pinned(),
            settings,
            overrides: OptionOverrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: OptionOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Effective options for the target platform.
    pub fn options(&self) -> PackageOptions {
        PackageOptions::for_platform(self.settings.os, &self.overrides)
    }

    pub fn definitions(&self) -> BuildDefinitions {
        map_options(&self.options(), self.settings.os)
    }

    pub fn link_metadata(&self) -> LinkMetadata {
        publish(&self.options(), self.settings.os)
    }

    pub fn package_id(&self) -> String {
        self.settings.package_id(&self.options())
    }
}

/// Everything a successful invocation produced.
#[derive(Debug, Clone)]
pub struct RecipeOutcome {
    pub reference: ArchiveReference,
    pub package_id: String,
    pub installed: InstalledPackage,
    pub link: LinkMetadata,
}

/// Run the whole recipe into `staging_root/<package id>`.
///
/// The version is validated before any network or file activity, and the
/// staging directory is only touched once the archive has been verified.
pub fn build_recipe(
    recipe: &Recipe,
    staging_root: &Path,
    fetcher: &dyn Fetcher,
    tool: &dyn BuildTool,
) -> Result<RecipeOutcome, RecipeError> {
    let reference = recipe.resolver.resolve(&recipe.version)?;
    tracing::info!(
        "Resolved sqlite {} -> {}",
        reference.version,
        reference.identifier
    );

    let archive = fetch_verified(&reference, fetcher)?;

    let options = recipe.options();
    let platform = recipe.settings.os;
    let definitions = map_options(&options, platform);
    let package_id = recipe.settings.package_id(&options);

    let layout = StagingLayout::for_package(staging_root, &package_id);
    layout.reset()?;

    let orchestrator = BuildOrchestrator::new(tool);
    let configured = orchestrator.configure(&definitions, &layout, &archive)?;
    let built = orchestrator.build(configured)?;
    let installed = orchestrator.install(built)?;

    let link = publish(&options, platform);
    if let Err(err) = link.write(installed.install_prefix()) {
        if let Err(cleanup) = remove_dir_all_if_exists(installed.install_prefix()) {
            tracing::warn!("failed to discard partial install: {:#}", cleanup);
        }
        return Err(RecipeError::Staging(err));
    }

    tracing::info!(
        "Installed {} into {} (links: {})",
        reference.identifier,
        installed.install_prefix().display(),
        link.libs.join(", ")
    );

    Ok(RecipeOutcome {
        reference,
        package_id,
        installed,
        link,
    })
}
