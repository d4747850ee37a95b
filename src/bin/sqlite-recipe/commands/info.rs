//! `sqlite-recipe info` command

use anyhow::Result;

use crate::cli::InfoArgs;
use crate::commands::recipe_from;
use sqlite_recipe::util::RecipeConfig;

pub fn execute(config: &RecipeConfig, args: InfoArgs) -> Result<()> {
    let recipe = recipe_from(config, &args.recipe)?;
    let link = recipe.link_metadata();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&link)?);
    } else {
        println!("{}", link.libs.join(" "));
    }

    Ok(())
}
