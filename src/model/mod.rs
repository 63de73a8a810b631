pub mod collection;
pub mod config;
pub mod moodle;
pub mod plugin;
