use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::InstallError;

pub const VERSION_FILE: &str = "version.php";

static BLOCK_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block comment regex"));
static COMPONENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\$plugin->component\s*=\s*['"]([A-Za-z0-9_]+)['"]\s*;"#)
        .expect("valid component regex")
});
static DEPENDENCIES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\$plugin->dependencies\s*=\s*(?:array\s*\((.*?)\)|\[(.*?)\])\s*;")
        .expect("valid dependencies regex")
});
static DEPENDENCY_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"['"]([A-Za-z0-9_]+)['"]\s*=>"#).expect("valid dependency key regex")
});

/// Frankenstyle component name, e.g. `local_ci` or `mod_forum`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Component(pub String);

impl Component {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits into plugin type and plugin name. Components without a type
    /// prefix are activity modules.
    pub fn split(&self) -> (&str, &str) {
        match self.0.split_once('_') {
            Some((plugin_type, name)) => (plugin_type, name),
            None => ("mod", &self.0),
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodlePlugin {
    pub directory: PathBuf,
    pub component: Component,
    pub dependencies: Vec<Component>,
}

impl MoodlePlugin {
    /// Reads the plugin metadata out of `version.php` in `directory`.
    pub fn load(directory: impl Into<PathBuf>) -> Result<Self, InstallError> {
        let directory = directory.into();
        let version_file = directory.join(VERSION_FILE);
        if !version_file.is_file() {
            return Err(InstallError::MissingVersionFile { path: version_file });
        }

        let raw = fs::read_to_string(&version_file)?;
        let source = strip_comments(&raw);

        let component = COMPONENT_RE
            .captures(&source)
            .map(|caps| Component::new(&caps[1]))
            .ok_or_else(|| InstallError::MissingComponent {
                path: version_file.clone(),
            })?;

        Ok(Self {
            directory,
            component,
            dependencies: parse_dependencies(&source),
        })
    }
}

fn strip_comments(source: &str) -> String {
    BLOCK_COMMENT_RE
        .replace_all(source, "")
        .lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            !trimmed.starts_with("//") && !trimmed.starts_with('#')
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_dependencies(source: &str) -> Vec<Component> {
    let Some(caps) = DEPENDENCIES_RE.captures(source) else {
        return Vec::new();
    };

    let Some(body) = caps.get(1).or_else(|| caps.get(2)) else {
        return Vec::new();
    };

    let mut dependencies: Vec<Component> = Vec::new();
    for key in DEPENDENCY_KEY_RE.captures_iter(body.as_str()) {
        let component = Component::new(&key[1]);
        if !dependencies.contains(&component) {
            dependencies.push(component);
        }
    }
    dependencies
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    pub(crate) fn write_plugin(
        parent: &Path,
        dir_name: &str,
        component: &str,
        deps: &[&str],
    ) -> PathBuf {
        let plugin_dir = parent.join(dir_name);
        fs::create_dir_all(&plugin_dir).unwrap();

        let deps = deps
            .iter()
            .map(|dep| format!("    '{dep}' => ANY_VERSION,\n"))
            .collect::<String>();
        fs::write(
            plugin_dir.join(VERSION_FILE),
            format!(
                "<?php\ndefined('MOODLE_INTERNAL') || die();\n\n\
                 $plugin->version = 2024010100;\n\
                 $plugin->component = '{component}';\n\
                 $plugin->dependencies = [\n{deps}];\n"
            ),
        )
        .unwrap();
        plugin_dir
    }

    #[test]
    fn test_load_component_and_dependencies() {
        let dir = tempdir().unwrap();
        let plugin_dir = write_plugin(
            dir.path(),
            "ci",
            "local_ci",
            &["mod_forum", "block_html"],
        );

        let plugin = MoodlePlugin::load(&plugin_dir).unwrap();
        assert_eq!(plugin.component.as_str(), "local_ci");
        assert_eq!(
            plugin.dependencies,
            vec![Component::new("mod_forum"), Component::new("block_html")]
        );
        assert_eq!(plugin.directory, plugin_dir);
    }

    #[test]
    fn test_load_legacy_array_syntax() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(VERSION_FILE),
            r#"<?php
// $plugin->component = 'local_commented';
/* $plugin->component = 'local_blocked'; */
$plugin->component = "qtype_essay";
$plugin->dependencies = array(
    'qbehaviour_manualgraded' => 2023100900,
);
"#,
        )
        .unwrap();

        let plugin = MoodlePlugin::load(dir.path()).unwrap();
        assert_eq!(plugin.component.as_str(), "qtype_essay");
        assert_eq!(
            plugin.dependencies,
            vec![Component::new("qbehaviour_manualgraded")]
        );
    }

    #[test]
    fn test_load_without_dependencies() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(VERSION_FILE),
            "<?php\n$plugin->component = 'block_test';\n",
        )
        .unwrap();

        let plugin = MoodlePlugin::load(dir.path()).unwrap();
        assert!(plugin.dependencies.is_empty());
    }

    #[test]
    fn test_missing_version_file() {
        let dir = tempdir().unwrap();
        let err = MoodlePlugin::load(dir.path()).unwrap_err();
        assert!(matches!(err, InstallError::MissingVersionFile { .. }));
    }

    #[test]
    fn test_missing_component() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(VERSION_FILE), "<?php\n$plugin->version = 1;\n").unwrap();

        let err = MoodlePlugin::load(dir.path()).unwrap_err();
        assert!(matches!(err, InstallError::MissingComponent { .. }));
    }

    #[test]
    fn test_component_split() {
        assert_eq!(Component::new("local_ci").split(), ("local", "ci"));
        assert_eq!(Component::new("tool_my_tool").split(), ("tool", "my_tool"));
        assert_eq!(Component::new("forum").split(), ("mod", "forum"));
    }
}
