use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("Plugin {component} is not installed in standard Moodle")]
    NotInstalledInHost { component: String },

    #[error("Plugin {component} is already installed in standard Moodle at {directory}")]
    AlreadyInstalled {
        component: String,
        directory: PathBuf,
    },

    #[error("The component {component} has an unknown plugin type of {plugin_type}")]
    UnknownPluginType {
        component: String,
        plugin_type: String,
    },

    #[error("Plugin version file not found: {path}")]
    MissingVersionFile { path: PathBuf },

    #[error("No component declared in {path}")]
    MissingComponent { path: PathBuf },

    #[error("Circular plugin dependency: {}", .components.join(" -> "))]
    CircularDependency { components: Vec<String> },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Walk(#[from] ignore::Error),
}
