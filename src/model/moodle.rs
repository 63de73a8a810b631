use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::InstallError;
use crate::model::plugin::Component;

/// Relative location of the plugin type table inside a Moodle checkout.
pub const COMPONENTS_FILE: &str = "lib/components.json";

/// Relative location of a parent plugin's subplugin type table.
pub const SUBPLUGINS_FILE: &str = "db/subplugins.json";

/// The application plugins get installed into.
pub trait HostApplication {
    fn root(&self) -> &Path;

    /// Canonical directory for `component`, independent of where its sources live.
    fn install_path(&self, component: &Component) -> Result<PathBuf, InstallError>;
}

#[derive(Debug, Deserialize)]
struct ComponentsFile {
    #[serde(default)]
    plugintypes: HashMap<String, String>,
}

/// `plugintypes` paths are relative to the Moodle root, `subplugintypes` paths to the
/// parent plugin. Newer parents list both; the relative form wins.
#[derive(Debug, Deserialize)]
struct SubpluginsFile {
    #[serde(default)]
    plugintypes: HashMap<String, String>,
    #[serde(default)]
    subplugintypes: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Moodle {
    pub directory: PathBuf,
    plugin_types: HashMap<String, String>,
}

impl Moodle {
    pub fn load(directory: impl Into<PathBuf>) -> Result<Self, InstallError> {
        let directory = directory.into();
        let raw = fs::read_to_string(directory.join(COMPONENTS_FILE))?;
        let components: ComponentsFile = serde_json::from_str(&raw)?;

        let mut plugin_types = components.plugintypes;
        let subplugin_types = subplugin_types(&directory, &plugin_types)?;
        tracing::debug!(
            "loaded {} plugin types and {} subplugin types from {}",
            plugin_types.len(),
            subplugin_types.len(),
            directory.display()
        );
        for (plugin_type, type_dir) in subplugin_types {
            plugin_types.entry(plugin_type).or_insert(type_dir);
        }

        Ok(Self {
            directory,
            plugin_types,
        })
    }
}

/// Subplugin types declared by every installed plugin, as directories relative to `root`.
fn subplugin_types(
    root: &Path,
    plugin_types: &HashMap<String, String>,
) -> Result<HashMap<String, String>, InstallError> {
    let mut found = HashMap::new();

    for type_dir in plugin_types.values() {
        let Ok(entries) = fs::read_dir(root.join(type_dir)) else {
            continue;
        };

        for entry in entries {
            let parent = entry?.path();
            let file = parent.join(SUBPLUGINS_FILE);
            if !file.is_file() {
                continue;
            }

            let raw = fs::read_to_string(&file)?;
            let declared: SubpluginsFile = serde_json::from_str(&raw)?;
            let parent_dir = parent.strip_prefix(root).unwrap_or(parent.as_path());

            for (subtype, dir) in declared.plugintypes {
                found.entry(subtype).or_insert(dir);
            }
            for (subtype, dir) in declared.subplugintypes {
                let dir = parent_dir.join(dir).to_string_lossy().into_owned();
                found.insert(subtype, dir);
            }
        }
    }

    Ok(found)
}

impl HostApplication for Moodle {
    fn root(&self) -> &Path {
        &self.directory
    }

    fn install_path(&self, component: &Component) -> Result<PathBuf, InstallError> {
        let (plugin_type, name) = component.split();
        let type_dir =
            self.plugin_types
                .get(plugin_type)
                .ok_or_else(|| InstallError::UnknownPluginType {
                    component: component.to_string(),
                    plugin_type: plugin_type.to_string(),
                })?;

        Ok(self.directory.join(type_dir).join(name))
    }
}
