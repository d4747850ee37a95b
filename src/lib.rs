//! sqlite-recipe - a reproducible build recipe for the SQLite amalgamation
//!
//! This crate resolves and verifies the pinned amalgamation archive, maps
//! package options onto CMake definitions, drives CMake through
//! configure/build/install into a staging layout and publishes the link
//! metadata downstream consumers need.

pub mod builder;
pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// Provides a scripted fetcher, a recording build tool and an in-memory
/// amalgamation archive so the pipeline can run without network or CMake.
#[cfg(test)]
pub mod test_support;

pub use core::{
    errors::RecipeError, options::PackageOptions, platform::PlatformTag, settings::Settings,
    version::VersionSpec,
};

pub use builder::{BuildDefinitions, BuildOrchestrator, StagingLayout};
pub use ops::{publish, LinkMetadata};
pub use sources::{ArchiveReference, ArchiveResolver};
