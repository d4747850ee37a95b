//! Command implementations

pub mod build;
pub mod definitions;
pub mod info;
pub mod package_id;
pub mod resolve;

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::RecipeArgs;
use sqlite_recipe::core::{BuildType, OptionOverrides, PlatformTag};
use sqlite_recipe::ops::Recipe;
use sqlite_recipe::util::RecipeConfig;

/// Load the explicit config file, or `./sqlite-recipe.toml` if present.
pub fn load_config(path: Option<&Path>) -> Result<RecipeConfig> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    RecipeConfig::discover(path, &cwd)
}

/// Build the recipe from config, with CLI flags taking precedence.
pub fn recipe_from(config: &RecipeConfig, args: &RecipeArgs) -> Result<Recipe> {
    let mut settings = config.settings()?;

    if let Some(ref os) = args.os {
        settings.os = os.parse::<PlatformTag>()?;
        if settings.os == PlatformTag::Other {
            tracing::warn!("unrecognized OS `{}`, no platform overrides will apply", os);
        }
    }

    if let Some(ref build_type) = args.build_type {
        settings.build_type = build_type
            .parse::<BuildType>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }

    let mut cli_overrides = OptionOverrides::default();
    for assignment in &args.options {
        cli_overrides.set_assignment(assignment)?;
    }
    let mut overrides = config.options.clone();
    overrides.merge(&cli_overrides);

    Ok(Recipe {
        version: config.version().to_string(),
        resolver: config.resolver()?,
        settings,
        overrides,
    })
}
