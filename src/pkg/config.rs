use anyhow::{Context, Result};
use log::warn;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use std::{env, fs, path::Path, sync::Arc};

use crate::pkg::board::paginator::DelayPolicy;

pub const DEFAULT_CONFIG_PATH: &str = "appsettings.yaml";
pub const CONFIG_PATH_ENV: &str = "BEERBOARD_CONFIG";
pub const API_URL_ENV: &str = "BEERBOARD_API_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Terminal,
    Html,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    #[serde(rename = "Mode")]
    pub mode: RenderMode,
    #[serde(rename = "OutputDir")]
    pub output_dir: String,
    #[serde(rename = "ImageBaseUrl")]
    pub image_base_url: String,
    #[serde(rename = "ClearScreen")]
    pub clear_screen: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            mode: RenderMode::Terminal,
            output_dir: "board".to_string(),
            image_base_url: "/images".to_string(),
            clear_screen: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockSettings {
    #[serde(rename = "Enabled")]
    pub enabled: bool,
    #[serde(rename = "IntervalMillis")]
    pub interval_millis: u64,
    #[serde(rename = "Format")]
    pub format: String,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_millis: 1000,
            format: "%-I:%M %p".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    #[serde(rename = "ApiUrl")]
    pub api_url: String,
    #[serde(rename = "SortBy")]
    pub sort_by: Vec<String>,
    #[serde(rename = "PageSize")]
    pub page_size: usize,
    #[serde(rename = "BaseDelayMillis")]
    pub base_delay_millis: u64,
    #[serde(rename = "SinglePageDelayMillis")]
    pub single_page_delay_millis: u64,
    #[serde(rename = "DelaySmoothing")]
    pub delay_smoothing: f64,
    #[serde(rename = "RequestTimeoutSecs")]
    pub request_timeout_secs: u64,
    #[serde(rename = "MaxRetries")]
    pub max_retries: usize,
    #[serde(rename = "Render")]
    pub render: RenderSettings,
    #[serde(rename = "Clock")]
    pub clock: ClockSettings,
    #[serde(rename = "Nicknames")]
    pub nicknames: HashMap<String, String>,
    #[serde(rename = "Debug")]
    pub debug: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8081".to_string(),
            sort_by: Vec::new(),
            page_size: 16,
            base_delay_millis: 5000,
            single_page_delay_millis: 1000,
            delay_smoothing: 3.0,
            request_timeout_secs: 10,
            max_retries: 1,
            render: RenderSettings::default(),
            clock: ClockSettings::default(),
            nicknames: HashMap::new(),
            debug: false,
        }
    }
}

impl AppSettings {
    /// Clamps values the board cannot run with.
    pub fn normalized(mut self) -> Self {
        if self.page_size == 0 {
            warn!("PageSize 0 is not usable, using 1");
            self.page_size = 1;
        }
        if !(self.delay_smoothing.is_finite() && self.delay_smoothing >= 0.0) {
            warn!("DelaySmoothing {} is not usable, using 0", self.delay_smoothing);
            self.delay_smoothing = 0.0;
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = 1;
        }
        self
    }

    pub fn delay_policy(&self) -> DelayPolicy {
        DelayPolicy::new(
            Duration::from_millis(self.base_delay_millis),
            Duration::from_millis(self.single_page_delay_millis),
            self.delay_smoothing,
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Global settings shared across the app, loaded on first use.
/// Holds the load error when the config file is unusable; startup stops on it.
pub static SETTINGS: Lazy<Result<Arc<AppSettings>>> =
    Lazy::new(|| load_settings(config_path()).map(Arc::new));

pub fn config_path() -> String {
    env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Reads the YAML file. A missing file yields defaults; a malformed one is an error.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppSettings> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("Config file {:?} not found, using defaults", path);
        return Ok(AppSettings::default());
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;

    parse_config(&data).with_context(|| format!("Failed to parse config file {:?}", path))
}

/// Config file plus environment overrides.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<AppSettings> {
    load_config(path).map(apply_env)
}

pub fn parse_config(data: &str) -> Result<AppSettings> {
    if data.trim().is_empty() {
        return Ok(AppSettings::default());
    }
    let settings: AppSettings = serde_yaml::from_str(data)?;
    Ok(settings.normalized())
}

fn apply_env(mut settings: AppSettings) -> AppSettings {
    if let Ok(url) = env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            settings.api_url = url;
        }
    }
    settings
}
