use std::{path::PathBuf, time::Duration};

use crate::{controller::StalePolicy, error::ConfigError};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_HANDLE: &str = "fawaziwalewa";

/// Runtime settings, read from the environment (and `.env`) at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base: String,
    /// Looked up once when the window opens.
    pub default_handle: String,
    /// `None` means requests may hang indefinitely.
    pub request_timeout: Option<Duration>,
    /// Where the theme preference is persisted. `None` keeps it in memory.
    pub theme_store: Option<PathBuf>,
    pub stale_policy: StalePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            default_handle: DEFAULT_HANDLE.into(),
            request_timeout: None,
            theme_store: None,
            stale_policy: StalePolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self {
            theme_store: default_theme_store(),
            ..Self::default()
        };

        if let Some(v) = read("DEVFINDER_API_BASE") {
            config.api_base = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = read("DEVFINDER_DEFAULT_HANDLE") {
            config.default_handle = v;
        }
        if let Some(v) = read("DEVFINDER_TIMEOUT_SECS") {
            let secs = v.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                name: "DEVFINDER_TIMEOUT_SECS",
                expected: "a whole number of seconds",
                value: v.clone(),
            })?;
            config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(v) = read("DEVFINDER_THEME_FILE") {
            config.theme_store = Some(PathBuf::from(v));
        }
        if let Some(v) = read("DEVFINDER_DISCARD_STALE") {
            config.stale_policy = if parse_flag("DEVFINDER_DISCARD_STALE", &v)? {
                StalePolicy::LatestRequestWins
            } else {
                StalePolicy::LastResolutionWins
            };
        }

        Ok(config)
    }
}

fn default_theme_store() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("devfinder").join("theme.json"))
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            expected: "a boolean",
            value: value.to_string(),
        }),
    }
}
