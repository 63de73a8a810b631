use std::fs;

use anyhow::{Context, Result, bail};

use crate::cli::InstallArgs;
use crate::model::collection::TopologicalSorter;
use crate::model::config::AppConfig;
use crate::model::moodle::Moodle;
use crate::model::plugin::MoodlePlugin;
use crate::plugin::{
    ConfigDumper, EnvDumper, InstallContext, InstallerCollection, PluginInstaller,
};

/// Runs the `install` subcommand and returns the final install state.
pub fn install(args: &InstallArgs, config: &AppConfig) -> Result<InstallContext> {
    if !args.plugin.is_dir() {
        bail!("plugin directory not found: {}", args.plugin.display());
    }
    let plugin_dir = fs::canonicalize(&args.plugin)
        .with_context(|| format!("resolving {}", args.plugin.display()))?;
    let moodle_dir = fs::canonicalize(&args.moodle)
        .with_context(|| format!("resolving Moodle directory {}", args.moodle.display()))?;

    let plugin = MoodlePlugin::load(plugin_dir)?;
    let moodle = Moodle::load(moodle_dir)?;

    let extra_plugins_dir = args
        .extra_plugins
        .clone()
        .or_else(|| config.extra_plugins_dir());
    let plugin_in_moodle_dir = args.plugin_in_moodle_dir || config.install.plugin_in_moodle_dir;

    let mut dumper = ConfigDumper::new();
    if !args.not_paths.is_empty() {
        dumper.add_section("filter", "notPaths", args.not_paths.clone());
    }
    if !args.not_names.is_empty() {
        dumper.add_section("filter", "notNames", args.not_names.clone());
    }

    tracing::debug!(
        "installing {} into {} (extra plugins: {:?}, in moodle dir: {plugin_in_moodle_dir})",
        plugin.component,
        moodle.directory.display(),
        extra_plugins_dir
    );

    let mut installers = InstallerCollection::new();
    installers.add(Box::new(PluginInstaller::new(
        Box::new(moodle),
        Box::new(TopologicalSorter),
        extra_plugins_dir,
        dumper,
        plugin_in_moodle_dir,
    )));

    let mut ctx = InstallContext::new(plugin);
    installers.run(&mut ctx)?;

    let env_file = args.env_file.clone().unwrap_or_else(|| config.env_file());
    EnvDumper::dump(&ctx.env, &env_file)
        .with_context(|| format!("writing {}", env_file.display()))?;

    Ok(ctx)
}
