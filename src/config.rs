use serde::Deserialize;

pub const CONFIG_FILE: &str = "photo-browser.toml";

/// Demo configuration, read from `photo-browser.toml` next to the binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory tree served as the sample photo library.
    pub photos_root: String,
    /// Edge length in pixels for grid thumbnails.
    pub thumbnail_edge: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            photos_root: "photos".to_string(),
            thumbnail_edge: 256,
        }
    }
}

pub fn load() -> AppConfig {
    match std::fs::read_to_string(CONFIG_FILE) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Invalid {}: {}; using defaults", CONFIG_FILE, e);
                AppConfig::default()
            }
        },
        Err(_) => AppConfig::default(),
    }
}
