//! Command-line interface implementation for create-astro-exe.
//! Provides argument parsing and help text formatting using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::project::PackageManager;

/// Command-line arguments structure for create-astro-exe.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Create a new Astro application", long_about = None)]
pub struct Args {
    /// Name of the project directory to create
    #[arg(value_name = "PROJECT_NAME")]
    pub project_name: Option<String>,

    /// Template directory to materialize instead of the bundled one
    #[arg(long, value_name = "DIR")]
    pub template: Option<PathBuf>,

    /// Project description (skips the prompt)
    #[arg(long)]
    pub description: Option<String>,

    /// Author name (skips the prompt)
    #[arg(long)]
    pub author: Option<String>,

    /// Package manager used to install dependencies (skips the prompt)
    #[arg(long, value_enum)]
    pub package_manager: Option<PackageManager>,

    /// Do not install dependencies
    #[arg(long)]
    pub no_install: bool,

    /// Do not initialize a git repository
    #[arg(long)]
    pub no_git: bool,

    /// Accept the default answer for every prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Write into an existing project directory without asking
    #[arg(short, long)]
    pub force: bool,

    /// Read answers as a JSON object from stdin
    #[arg(short, long)]
    pub stdin: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
pub fn get_args() -> Args {
    Args::parse()
}
