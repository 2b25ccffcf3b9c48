use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub port: Option<u16>,
    pub logging_level: Option<String>,

    // Feature configs
    pub site: Option<SiteConfig>,
    pub timing: Option<TimingConfig>,
}

/// Action labels of the booking site's result cells.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct SiteConfig {
    pub reserve_marker: Option<String>,
    pub waitlist_marker: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct TimingConfig {
    pub post_login_delay_ms: Option<u64>,
    pub post_search_delay_ms: Option<u64>,
    pub modal_wait_ms: Option<u64>,
    pub requery_base_delay_ms: Option<u64>,
    pub requery_jitter_ms: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
