use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::InstallError;

/// Persists installer environment entries for later pipeline steps.
#[derive(Debug, Default)]
pub struct EnvDumper;

impl EnvDumper {
    pub fn dump(values: &BTreeMap<String, String>, to_file: &Path) -> Result<(), InstallError> {
        if values.is_empty() {
            tracing::debug!("no environment values, skipping {}", to_file.display());
            return Ok(());
        }

        let content: String = values
            .iter()
            .map(|(name, value)| format!("{name}={value}\n"))
            .collect();

        if let Some(parent) = to_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(to_file, content)?;

        tracing::debug!("wrote {} environment values to {}", values.len(), to_file.display());
        Ok(())
    }
}
