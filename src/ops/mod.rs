//! High-level operations.

pub mod package_info;
pub mod recipe_build;

pub use package_info::{publish, LinkMetadata};
pub use recipe_build::{build_recipe, Recipe, RecipeOutcome};
