//! Link metadata published to downstream consumers.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::options::PackageOptions;
use crate::core::platform::PlatformTag;
use crate::util::fs::write_bytes;

/// Name of the library this recipe produces.
pub const PRIMARY_LIBRARY: &str = "sqlite3";

/// Threading library required on Linux when mutexes are compiled in.
pub const THREAD_LIBRARY: &str = "pthread";

/// Dynamic loader library required on Linux for extension loading.
pub const LOADER_LIBRARY: &str = "dl";

/// File written into the install prefix by [`LinkMetadata::write`].
pub const METADATA_FILE: &str = "sqlite3-link.json";

/// Libraries a consumer must link, in static link resolution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMetadata {
    pub libs: Vec<String>,
}

impl LinkMetadata {
    pub fn libs(&self) -> &[String] {
        &self.libs
    }

    /// Write as JSON into `install_prefix`.
    pub fn write(&self, install_prefix: &Path) -> Result<()> {
        let path = install_prefix.join(METADATA_FILE);
        let json =
            serde_json::to_string_pretty(self).context("failed to serialize link metadata")?;
        write_bytes(&path, json.as_bytes())
    }
}

/// Link requirements for a build with `options` on `platform`.
pub fn publish(options: &PackageOptions, platform: PlatformTag) -> LinkMetadata {
    let mut libs = vec![PRIMARY_LIBRARY.to_string()];

    if platform.is_linux() {
        if options.threadsafe.is_enabled() {
            libs.push(THREAD_LIBRARY.to_string());
        }
        if options.allows_load_extension() {
            libs.push(LOADER_LIBRARY.to_string());
        }
    }

    LinkMetadata { libs }
}
