use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::config::AppConfig;

const APP_DIR: &str = "findit";
const CONFIG_FILE: &str = "config.toml";

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

/// Directory for item data and logs.
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join(APP_DIR))
}

pub fn load() -> color_eyre::Result<AppConfig> {
    let Some(path) = config_path() else {
        debug!("No config directory found, using defaults");
        return Ok(AppConfig::default());
    };

    if !path.exists() {
        debug!(?path, "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(&path)?;
    let config: AppConfig = toml::from_str(&content)?;
    debug!(?path, "Loaded config");
    Ok(config)
}

pub fn save(config: &AppConfig) -> color_eyre::Result<()> {
    let Some(dir) = config_dir() else {
        warn!("Could not determine config directory");
        return Ok(());
    };

    fs::create_dir_all(&dir)?;
    let path = dir.join(CONFIG_FILE);
    fs::write(&path, toml::to_string_pretty(config)?)?;
    debug!(?path, "Saved config");
    Ok(())
}

pub fn save_theme(theme_name: &str) -> color_eyre::Result<()> {
    let mut config = load().unwrap_or_default();
    config.theme.name = theme_name.to_string();
    save(&config)
}
