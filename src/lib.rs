//! Installs Moodle plugins into a Moodle checkout for continuous integration.
//!
//! The plugin under test and any extra plugins are copied into the directory the
//! Moodle checkout expects for their component, in dependency order. The final
//! location of the plugin under test is handed to later pipeline steps through
//! the `PLUGIN_DIR` environment entry.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod model;
pub mod plugin;

pub use error::InstallError;
