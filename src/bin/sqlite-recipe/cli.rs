//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// sqlite-recipe - reproducible builds of the SQLite amalgamation
#[derive(Parser)]
#[command(name = "sqlite-recipe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a recipe config file (defaults to ./sqlite-recipe.toml)
    #[arg(long, global = true, env = "SQLITE_RECIPE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the archive name, candidate sources and expected digest
    Resolve(ResolveArgs),

    /// Show the CMake definitions for the selected options and platform
    Definitions(RecipeArgs),

    /// Show the libraries consumers must link
    Info(InfoArgs),

    /// Show the package id for the selected settings and options
    PackageId(RecipeArgs),

    /// Fetch, verify, build and install into the staging directory
    Build(BuildArgs),
}

/// Settings and option overrides shared by most commands.
#[derive(Args, Clone)]
pub struct RecipeArgs {
    /// Target operating system (Linux, Windows, Macos, iOS, Android, ...)
    #[arg(long)]
    pub os: Option<String>,

    /// Build type (Debug, Release, RelWithDebInfo, MinSizeRel)
    #[arg(long)]
    pub build_type: Option<String>,

    /// Set a package option, e.g. `-o threadsafe=2` (repeatable)
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub options: Vec<String>,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Version to resolve (defaults to the configured/pinned version)
    pub version: Option<String>,
}

#[derive(Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,

    /// Staging root (each package id gets its own subdirectory)
    #[arg(long)]
    pub staging_dir: Option<PathBuf>,

    /// Offline vendor cache root
    #[arg(long)]
    pub vendor_dir: Option<PathBuf>,

    /// Number of parallel build jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}
