//! Core data types: version, options, platform and host settings.

pub mod errors;
pub mod options;
pub mod platform;
pub mod settings;
pub mod version;

pub use errors::{Phase, RecipeError, Result};
pub use options::{OptionOverrides, OptionValue, PackageOptions, ThreadSafety};
pub use platform::PlatformTag;
pub use settings::{BuildType, Settings};
pub use version::VersionSpec;
