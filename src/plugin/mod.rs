pub mod config_dumper;
pub mod env_dumper;
pub mod installer;
pub mod manager;
pub mod mirror;
pub mod output;

use std::collections::BTreeMap;

use crate::error::InstallError;
use crate::model::plugin::MoodlePlugin;

pub use config_dumper::ConfigDumper;
pub use env_dumper::EnvDumper;
pub use installer::PluginInstaller;
pub use manager::InstallerCollection;
pub use output::InstallOutput;

/// Environment key later pipeline steps read the installed plugin path from.
pub const PLUGIN_DIR_ENV: &str = "PLUGIN_DIR";

/// State shared by every installer of a run. The plugin under test is updated in
/// place once it has been installed.
#[derive(Debug)]
pub struct InstallContext {
    pub plugin: MoodlePlugin,
    pub env: BTreeMap<String, String>,
    pub output: InstallOutput,
}

impl InstallContext {
    pub fn new(plugin: MoodlePlugin) -> Self {
        Self {
            plugin,
            env: BTreeMap::new(),
            output: InstallOutput::new(),
        }
    }

    pub fn add_env(&mut self, key: &str, value: impl Into<String>) {
        self.env.insert(key.to_string(), value.into());
    }
}

pub trait Installer {
    fn install(&mut self, ctx: &mut InstallContext) -> Result<(), InstallError>;

    /// Number of progress steps `install` reports.
    fn step_count(&self) -> usize;
}
