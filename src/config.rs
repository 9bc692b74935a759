use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_ENV_PREFIX: &str = "LINKDECK";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub ui: UIConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinksConfig {
    /// Path to a JSON file, or an http(s) URL, holding the link list.
    #[serde(default = "default_source")]
    pub source: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
        }
    }
}

fn default_source() -> String {
    "data/links.json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UIConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Read once at startup; suppresses ripple/jump animations and
    /// shortens the splash.
    #[serde(default)]
    pub reduced_motion: bool,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            reduced_motion: false,
        }
    }
}

fn default_theme() -> String {
    "default".into()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimingConfig {
    #[serde(default = "default_splash", with = "humantime_serde")]
    pub splash: Duration,
    #[serde(default = "default_splash_reduced", with = "humantime_serde")]
    pub splash_reduced: Duration,
    #[serde(default = "default_splash_fade", with = "humantime_serde")]
    pub splash_fade: Duration,
    #[serde(default = "default_toast", with = "humantime_serde")]
    pub toast: Duration,
    #[serde(default = "default_jump", with = "humantime_serde")]
    pub jump: Duration,
    #[serde(default = "default_ripple", with = "humantime_serde")]
    pub ripple: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            splash: default_splash(),
            splash_reduced: default_splash_reduced(),
            splash_fade: default_splash_fade(),
            toast: default_toast(),
            jump: default_jump(),
            ripple: default_ripple(),
        }
    }
}

fn default_splash() -> Duration {
    Duration::from_millis(2400)
}

fn default_splash_reduced() -> Duration {
    Duration::from_millis(400)
}

fn default_splash_fade() -> Duration {
    Duration::from_millis(1000)
}

fn default_toast() -> Duration {
    Duration::from_millis(1500)
}

fn default_jump() -> Duration {
    Duration::from_millis(600)
}

fn default_ripple() -> Duration {
    Duration::from_millis(450)
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub config_file: Option<PathBuf>,
    pub env_prefix: Option<String>,
}

pub fn load(options: LoadOptions) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(path) = options.config_file.as_ref() {
        if path.exists() {
            cfg = read_config_file(path)?;
        }
    } else if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            cfg = read_config_file(&default_path)?;
        }
    }

    let prefix = options.env_prefix.as_deref().unwrap_or(DEFAULT_ENV_PREFIX);
    apply_env(&mut cfg, prefix);

    Ok(cfg)
}

fn read_config_file(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&data)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
    Ok(config)
}

fn apply_env(cfg: &mut Config, prefix: &str) {
    let mut map: HashMap<String, String> = HashMap::new();
    let upper_prefix = format!("{}_", prefix.to_uppercase());

    for (key, value) in env::vars() {
        if let Some(stripped) = key.strip_prefix(&upper_prefix) {
            let normalized = stripped.to_ascii_lowercase().replace("__", ".");
            map.insert(normalized, value);
        }
    }

    for (key, value) in map {
        apply_env_value(cfg, &key, value);
    }
}

fn apply_env_value(cfg: &mut Config, key: &str, value: String) {
    match key {
        "links.source" => cfg.links.source = value,
        "ui.theme" => cfg.ui.theme = value,
        "ui.reduced_motion" => {
            cfg.ui.reduced_motion = matches!(value.as_str(), "1" | "true" | "TRUE" | "True");
        }
        "timing.splash" => apply_duration(&mut cfg.timing.splash, &value),
        "timing.splash_reduced" => apply_duration(&mut cfg.timing.splash_reduced, &value),
        "timing.splash_fade" => apply_duration(&mut cfg.timing.splash_fade, &value),
        "timing.toast" => apply_duration(&mut cfg.timing.toast, &value),
        "timing.jump" => apply_duration(&mut cfg.timing.jump, &value),
        "timing.ripple" => apply_duration(&mut cfg.timing.ripple, &value),
        _ => {}
    }
}

fn apply_duration(slot: &mut Duration, value: &str) {
    if let Ok(duration) = humantime::parse_duration(value) {
        *slot = duration;
    }
}

pub fn default_path() -> Option<PathBuf> {
    default_config_path()
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("linkdeck").join("config.yaml"))
}
