pub mod actions;
pub mod key;
pub mod keybindings;
pub mod loader;
pub mod resolver;

use std::path::PathBuf;

pub use actions::*;
use keybindings::KeybindingsConfig;
pub use loader::{data_dir, load, save_theme};
pub use resolver::KeyResolver;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

/// Where item reports are read from and written to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub path: PathBuf,
    /// How often the item file is checked for outside changes.
    pub poll_interval_ms: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: loader::data_dir().map_or_else(|| PathBuf::from("items.json"), |dir| dir.join("items.json")),
            poll_interval_ms: 2000,
        }
    }
}

/// Identity provider settings. Without a usable key a local demo session is used.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    pub publishable_key: Option<String>,
    pub account_id: Option<String>,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}
