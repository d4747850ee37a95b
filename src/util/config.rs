//! Recipe configuration file.
//!
//! Looked up as `sqlite-recipe.toml` in the working directory unless a path
//! is given explicitly. Every key is optional; missing keys fall back to the
//! pinned release and the host settings.
//!
//! ```toml
//! [package]
//! version = "3.28.0"
//!
//! [source]
//! sha256 = "d02fc4e95cfef672b45052e221617a050b7f2e20103661cda88387349a9b1327"
//! mirror = "https://www.sqlite.org/"
//! release_year = 2019
//! vendor_dir = "/opt/vendor"
//!
//! [settings]
//! os = "Linux"
//! build_type = "Release"
//!
//! [options]
//! threadsafe = 2
//! enable_fts5 = true
//!
//! [build]
//! staging_dir = "target/sqlite-staging"
//! jobs = 8
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::options::OptionOverrides;
use crate::core::platform::PlatformTag;
use crate::core::settings::{BuildType, Settings};
use crate::sources::archive::{
    ArchiveResolver, DEFAULT_MIRROR, PINNED_RELEASE_YEAR, PINNED_SHA256, PINNED_VERSION,
};

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "sqlite-recipe.toml";

/// Recipe configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecipeConfig {
    pub package: PackageConfig,
    pub source: SourceConfig,
    pub settings: SettingsConfig,
    pub options: OptionOverrides,
    pub build: BuildConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageConfig {
    pub version: Option<String>,
}

/// Where the archive comes from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub sha256: Option<String>,
    pub mirror: Option<String>,
    pub release_year: Option<u16>,
    /// Root of the offline vendor cache
    pub vendor_dir: Option<PathBuf>,
    /// HTTP timeout in seconds
    pub timeout: Option<u64>,
}

/// Overrides for the host-detected settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsConfig {
    pub os: Option<PlatformTag>,
    pub compiler: Option<String>,
    pub arch: Option<String>,
    pub build_type: Option<String>,
    pub libcxx: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub staging_dir: Option<PathBuf>,
    pub generator: Option<String>,
    pub jobs: Option<usize>,
}

impl RecipeConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load `path` if given, else `dir/sqlite-recipe.toml` if present, else
    /// defaults. An explicit path that does not exist is an error.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!("using config {}", candidate.display());
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn version(&self) -> &str {
        self.package.version.as_deref().unwrap_or(PINNED_VERSION)
    }

    /// Archive resolver for the configured mirror and digest.
    pub fn resolver(&self) -> Result<ArchiveResolver> {
        let resolver = ArchiveResolver::new(
            self.source.mirror.as_deref().unwrap_or(DEFAULT_MIRROR),
            self.source.release_year.unwrap_or(PINNED_RELEASE_YEAR),
            self.source.sha256.as_deref().unwrap_or(PINNED_SHA256),
        )?;
        Ok(resolver)
    }

    /// Host settings with configured overrides applied.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::host();
        let cfg = &self.settings;

        if let Some(os) = cfg.os {
            settings.os = os;
        }
        if cfg.compiler.is_some() {
            settings.compiler = cfg.compiler.clone();
        }
        if let Some(ref arch) = cfg.arch {
            settings.arch = arch.clone();
        }
        if let Some(ref build_type) = cfg.build_type {
            settings.build_type = build_type
                .parse::<BuildType>()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        settings.libcxx = cfg.libcxx.clone();

        Ok(settings)
    }

    /// Vendor cache root: configured, else the per-user cache directory.
    pub fn vendor_dir(&self) -> Option<PathBuf> {
        self.source.vendor_dir.clone().or_else(default_vendor_dir)
    }

    /// Staging root: configured, else `./sqlite-staging`.
    pub fn staging_dir(&self, cwd: &Path) -> PathBuf {
        match self.build.staging_dir {
            Some(ref dir) if dir.is_absolute() => dir.clone(),
            Some(ref dir) => cwd.join(dir),
            None => cwd.join("sqlite-staging"),
        }
    }
}

/// Per-user vendor cache (`~/.cache/sqlite-recipe/vendor` on Linux).
pub fn default_vendor_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "sqlite-recipe").map(|d| d.cache_dir().join("vendor"))
}
