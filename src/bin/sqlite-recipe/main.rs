//! sqlite-recipe CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sqlite_recipe::RecipeError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        if let Some(hint) = e.downcast_ref::<RecipeError>().and_then(RecipeError::hint) {
            eprintln!("{}", hint);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("sqlite_recipe=debug")
    } else {
        EnvFilter::new("sqlite_recipe=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(&config, args),
        Commands::Definitions(args) => commands::definitions::execute(&config, args),
        Commands::Info(args) => commands::info::execute(&config, args),
        Commands::PackageId(args) => commands::package_id::execute(&config, args),
        Commands::Build(args) => commands::build::execute(&config, args, cli.verbose),
    }
}
