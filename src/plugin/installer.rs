use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::InstallError;
use crate::model::collection::{DependencySorter, PluginCollection};
use crate::model::moodle::HostApplication;
use crate::model::plugin::MoodlePlugin;
use crate::plugin::config_dumper::{CONFIG_FILE, ConfigDumper};
use crate::plugin::mirror::mirror;
use crate::plugin::{InstallContext, Installer, PLUGIN_DIR_ENV};

/// Copies the plugin under test and any extra plugins into the host application.
pub struct PluginInstaller {
    moodle: Box<dyn HostApplication>,
    sorter: Box<dyn DependencySorter>,
    extra_plugins_dir: Option<PathBuf>,
    config_dumper: ConfigDumper,
    plugin_in_moodle_dir: bool,
}

impl PluginInstaller {
    pub fn new(
        moodle: Box<dyn HostApplication>,
        sorter: Box<dyn DependencySorter>,
        extra_plugins_dir: Option<PathBuf>,
        config_dumper: ConfigDumper,
        plugin_in_moodle_dir: bool,
    ) -> Self {
        Self {
            moodle,
            sorter,
            extra_plugins_dir,
            config_dumper,
            plugin_in_moodle_dir,
        }
    }

    /// Every immediate, non-hidden subdirectory of the extra plugins directory.
    pub fn scan_for_plugins(&self) -> Result<PluginCollection, InstallError> {
        let mut plugins = PluginCollection::new();

        let Some(dir) = self
            .extra_plugins_dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
        else {
            return Ok(plugins);
        };

        let walker = WalkBuilder::new(dir)
            .standard_filters(false)
            .hidden(true)
            .max_depth(Some(1))
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            let entry = entry?;
            if entry.depth() == 0 || !entry.path().is_dir() {
                continue;
            }
            plugins.add(MoodlePlugin::load(entry.path())?);
        }

        tracing::debug!(
            "found {} extra plugins in {}",
            plugins.len(),
            dir.display()
        );
        Ok(plugins)
    }

    /// Places `plugin` at its standard location and returns that directory.
    pub fn install_plugin_into_moodle(
        &self,
        plugin: &MoodlePlugin,
    ) -> Result<PathBuf, InstallError> {
        tracing::info!("Installing {}", plugin.component);

        let directory = self.moodle.install_path(&plugin.component)?;

        if self.plugin_in_moodle_dir {
            if !directory.is_dir() {
                return Err(InstallError::NotInstalledInHost {
                    component: plugin.component.to_string(),
                });
            }
            return Ok(directory);
        }

        if directory.is_dir() {
            return Err(InstallError::AlreadyInstalled {
                component: plugin.component.to_string(),
                directory,
            });
        }

        tracing::info!(
            "Copying plugin from {} to {}",
            plugin.directory.display(),
            directory.display()
        );
        mirror(&plugin.directory, &directory)?;

        Ok(directory)
    }

    /// Writes pending configuration to `to_file` unless the file is already there.
    pub fn create_config_file(&self, to_file: &Path) -> Result<(), InstallError> {
        if to_file.exists() {
            tracing::debug!(
                "Config file already exists in plugin, skipping creation of config file."
            );
            return Ok(());
        }
        if !self.config_dumper.has_config() {
            tracing::debug!("No config to write out, skipping creation of config file.");
            return Ok(());
        }

        self.config_dumper.dump(to_file)?;
        tracing::debug!("Created config file at {}", to_file.display());
        Ok(())
    }
}

impl Installer for PluginInstaller {
    fn install(&mut self, ctx: &mut InstallContext) -> Result<(), InstallError> {
        ctx.output.step("Install plugins");

        // Extra plugins already live in the host tree, so they are not scanned.
        if self.plugin_in_moodle_dir {
            let root = self.moodle.root().to_path_buf();
            self.create_config_file(&root.join(CONFIG_FILE))?;
            ctx.add_env(PLUGIN_DIR_ENV, root.to_string_lossy());
            return Ok(());
        }

        let mut plugins = self.scan_for_plugins()?;
        plugins.add(ctx.plugin.clone());
        let sorted = plugins.sort_by_dependencies(self.sorter.as_ref())?;

        for plugin in sorted {
            let directory = self.install_plugin_into_moodle(&plugin)?;

            if plugin.component == ctx.plugin.component {
                ctx.add_env(PLUGIN_DIR_ENV, directory.to_string_lossy());
                self.create_config_file(&directory.join(CONFIG_FILE))?;
                ctx.plugin.directory = directory;
            }
        }

        Ok(())
    }

    fn step_count(&self) -> usize {
        1
    }
}
