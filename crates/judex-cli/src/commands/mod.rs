pub mod classes;
pub mod config;
pub mod scrape;

use std::path::{Path, PathBuf};

use judex_core::JudexConfig;

pub(crate) fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("judex")
        .join("config.json")
}

/// Resolve `--config`, falling back to the per-user default location.
pub(crate) fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the configuration at `path`, or defaults when no file exists there.
pub(crate) fn load_config(path: &Path) -> anyhow::Result<JudexConfig> {
    if path.exists() {
        Ok(JudexConfig::from_file(path)?)
    } else {
        Ok(JudexConfig::default())
    }
}
