//! `sqlite-recipe build` command

use std::time::Duration;

use anyhow::{Context, Result};

use crate::cli::BuildArgs;
use crate::commands::recipe_from;
use sqlite_recipe::builder::CMakeTool;
use sqlite_recipe::ops::build_recipe;
use sqlite_recipe::sources::{DefaultFetcher, HttpFetcher, VendorFetcher};
use sqlite_recipe::util::RecipeConfig;

pub fn execute(config: &RecipeConfig, args: BuildArgs, verbose: bool) -> Result<()> {
    let recipe = recipe_from(config, &args.recipe)?;
    let cwd = std::env::current_dir().context("failed to get current directory")?;

    let staging_root = args
        .staging_dir
        .unwrap_or_else(|| config.staging_dir(&cwd));

    let vendor_dir = args
        .vendor_dir
        .or_else(|| config.vendor_dir())
        .unwrap_or_else(|| cwd.join("vendor"));
    tracing::debug!("vendor cache: {}", vendor_dir.display());

    let http = HttpFetcher::new(config.source.timeout.map(Duration::from_secs))?;
    let fetcher = DefaultFetcher::new(VendorFetcher::new(vendor_dir), http);

    let tool = CMakeTool::new(recipe.settings.build_type)?
        .generator(config.build.generator.clone())
        .jobs(args.jobs.or(config.build.jobs))
        .verbose(verbose);

    let outcome = build_recipe(&recipe, &staging_root, &fetcher, &tool)?;

    eprintln!(
        "    Finished sqlite {} [{}] -> {}",
        outcome.reference.version,
        outcome.package_id,
        outcome.installed.install_prefix().display()
    );
    println!("{}", outcome.link.libs.join(" "));

    Ok(())
}
