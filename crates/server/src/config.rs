use std::{collections::HashMap, fs, path::PathBuf};

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub bind_addr: String,
    pub data_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".into(),
            data_dir: "./data".into(),
        }
    }
}

/// Defaults, overridden by `server.toml`, overridden by environment
/// (`SERVER_BIND`/`APP__BIND_ADDR`, `DATA_DIR`/`APP__DATA_DIR`).
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file_settings(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("SERVER_BIND") {
        settings.bind_addr = v;
    }
    if let Ok(v) = std::env::var("APP__BIND_ADDR") {
        settings.bind_addr = v;
    }

    if let Ok(v) = std::env::var("DATA_DIR") {
        settings.data_dir = PathBuf::from(v);
    }
    if let Ok(v) = std::env::var("APP__DATA_DIR") {
        settings.data_dir = PathBuf::from(v);
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("bind_addr") {
            settings.bind_addr = v.clone();
        }
        if let Some(v) = file_cfg.get("data_dir") {
            settings.data_dir = PathBuf::from(v);
        }
    }
}
