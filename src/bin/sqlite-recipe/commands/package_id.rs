//! `sqlite-recipe package-id` command

use anyhow::Result;

use crate::cli::RecipeArgs;
use crate::commands::recipe_from;
use sqlite_recipe::util::RecipeConfig;

pub fn execute(config: &RecipeConfig, args: RecipeArgs) -> Result<()> {
    let recipe = recipe_from(config, &args)?;
    println!("{}", recipe.package_id());
    Ok(())
}
