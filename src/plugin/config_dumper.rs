use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_yaml::Value;

use crate::error::InstallError;

/// File name of the per-plugin CI config, relative to the plugin directory.
pub const CONFIG_FILE: &str = ".moodle-plugin-ci.yml";

/// Configuration gathered from the command line, written into the plugin on install.
#[derive(Debug, Clone, Default)]
pub struct ConfigDumper {
    sections: BTreeMap<String, BTreeMap<String, Value>>,
}

impl ConfigDumper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_section(&mut self, section: &str, key: &str, value: impl Into<Value>) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    pub fn has_config(&self) -> bool {
        !self.sections.is_empty()
    }

    pub fn dump(&self, to_file: &Path) -> Result<(), InstallError> {
        let yaml = serde_yaml::to_string(&self.sections)?;
        fs::write(to_file, yaml)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_dumper_has_no_config() {
        assert!(!ConfigDumper::new().has_config());
    }

    #[test]
    fn test_dump_sections_as_yaml() {
        let dir = tempdir().unwrap();
        let to_file = dir.path().join(CONFIG_FILE);

        let mut dumper = ConfigDumper::new();
        dumper.add_section("filter", "notPaths", vec!["tests/fixtures", "vendor"]);
        dumper.add_section("filter", "notNames", vec!["*.min.js"]);
        assert!(dumper.has_config());

        dumper.dump(&to_file).unwrap();

        let written: BTreeMap<String, BTreeMap<String, Vec<String>>> =
            serde_yaml::from_str(&fs::read_to_string(&to_file).unwrap()).unwrap();
        assert_eq!(
            written["filter"]["notPaths"],
            vec!["tests/fixtures".to_string(), "vendor".to_string()]
        );
        assert_eq!(written["filter"]["notNames"], vec!["*.min.js".to_string()]);
    }
}
