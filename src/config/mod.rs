mod file_config;

pub use file_config::{FileConfig, SiteConfig, TimingConfig};

use crate::automation::AutomationSettings;
use crate::server::RequestsLoggingLevel;
use anyhow::Result;
use clap::ValueEnum;
use std::time::Duration;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub automation: AutomationSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let defaults = AutomationSettings::default();
        let site = file.site.unwrap_or_default();
        let timing = file.timing.unwrap_or_default();

        let mut automation = AutomationSettings {
            post_login_delay: timing
                .post_login_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.post_login_delay),
            post_search_delay: timing
                .post_search_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.post_search_delay),
            modal_wait: timing
                .modal_wait_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.modal_wait),
            requery_base_delay: timing
                .requery_base_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.requery_base_delay),
            requery_jitter: timing
                .requery_jitter_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.requery_jitter),
            reserve_marker: site.reserve_marker.unwrap_or(defaults.reserve_marker),
            waitlist_marker: site.waitlist_marker.unwrap_or(defaults.waitlist_marker),
        };

        // Dev builds shrink every delay so end-to-end runs finish quickly.
        if cfg!(feature = "fast") {
            automation.post_login_delay = Duration::from_millis(1);
            automation.post_search_delay = Duration::from_millis(1);
            automation.modal_wait = Duration::from_millis(1);
            automation.requery_base_delay = Duration::from_millis(1);
            automation.requery_jitter = Duration::from_millis(0);
        }

        Ok(Self {
            port,
            logging_level,
            automation,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
