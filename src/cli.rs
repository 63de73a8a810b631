//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Moodle plugin CI helper
#[derive(Parser, Debug)]
#[command(
    name = "moodle-plugin-ci",
    version,
    about = "Installs Moodle plugins into a Moodle checkout for CI runs"
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Read settings from this file instead of the per-user config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install the plugin under test and any extra plugins into Moodle
    Install(InstallArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InstallArgs {
    /// Moodle checkout the plugins are installed into
    #[arg(long, default_value = "moodle")]
    pub moodle: PathBuf,

    /// Plugin under test
    #[arg(long)]
    pub plugin: PathBuf,

    /// Directory of additional plugins, one per subdirectory
    #[arg(long)]
    pub extra_plugins: Option<PathBuf>,

    /// Plugins already live in the Moodle checkout and are not copied
    #[arg(long)]
    pub plugin_in_moodle_dir: bool,

    /// Paths excluded from code checks, written to the plugin config file
    #[arg(long, value_delimiter = ',')]
    pub not_paths: Vec<String>,

    /// File names excluded from code checks, written to the plugin config file
    #[arg(long, value_delimiter = ',')]
    pub not_names: Vec<String>,

    /// Where environment values for later steps are written
    #[arg(long)]
    pub env_file: Option<PathBuf>,
}
