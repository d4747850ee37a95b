//! Build configuration and the CMake build pipeline.

pub mod cmake;
pub mod definitions;
pub mod extract;
pub mod orchestrator;

pub use cmake::CMakeTool;
pub use definitions::{map_options, BuildDefinitions, DefinitionValue, OverrideRule};
pub use extract::extract_archive;
pub use orchestrator::{
    BuildOrchestrator, BuildTool, BuiltTree, ConfiguredBuild, InstalledPackage, StagingLayout,
};
