//! `sqlite-recipe resolve` command

use anyhow::Result;

use crate::cli::ResolveArgs;
use sqlite_recipe::util::RecipeConfig;

pub fn execute(config: &RecipeConfig, args: ResolveArgs) -> Result<()> {
    let version = args.version.as_deref().unwrap_or(config.version());
    let reference = config.resolver()?.resolve(version)?;

    println!("archive: {}", reference.identifier);
    println!("sha256:  {}", reference.expected_digest);
    for (i, source) in reference.candidate_sources.iter().enumerate() {
        println!("source {}: {}", i + 1, source);
    }

    Ok(())
}
