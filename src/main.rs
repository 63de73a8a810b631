use anyhow::Result;
use clap::Parser;

use moodle_plugin_ci::cli::{Cli, Command};
use moodle_plugin_ci::model::config::AppConfig;
use moodle_plugin_ci::plugin::PLUGIN_DIR_ENV;
use moodle_plugin_ci::{commands, logger};

fn main() -> Result<()> {
    let args = Cli::parse();

    let config = AppConfig::load(args.config.as_deref())?;

    // Logging goes to stderr; stdout carries the installed plugin path.
    let _guard = logger::init_logger(args.verbose, args.quiet, &config.output.log_filter);

    tracing::info!("moodle-plugin-ci starting");

    match args.command {
        Command::Install(install_args) => {
            let ctx = commands::install(&install_args, &config)?;
            if let Some(dir) = ctx.env.get(PLUGIN_DIR_ENV) {
                println!("{dir}");
            }
        }
    }

    Ok(())
}
