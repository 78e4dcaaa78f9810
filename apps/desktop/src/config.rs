use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use client_core::{DEFAULT_ANALYSIS_ENDPOINT, DEFAULT_REQUEST_TIMEOUT};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "radimal.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ANALYSIS_ENDPOINT.into(),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn apply_file(&mut self, file_cfg: FileSettings) {
        if let Some(v) = file_cfg.endpoint {
            self.endpoint = v;
        }
        if let Some(v) = file_cfg.timeout_secs {
            self.timeout_secs = v;
        }
    }

    /// Later keys win, so `APP__*` overrides `RADIMAL_*`.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for key in ["RADIMAL_ENDPOINT", "APP__ENDPOINT"] {
            if let Some(v) = lookup(key) {
                self.endpoint = v;
            }
        }
        for key in ["RADIMAL_TIMEOUT_SECS", "APP__TIMEOUT_SECS"] {
            if let Some(parsed) = lookup(key).and_then(|v| v.trim().parse::<u64>().ok()) {
                self.timeout_secs = parsed;
            }
        }
    }

    pub fn with_cli_overrides(
        mut self,
        endpoint: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        if let Some(v) = endpoint {
            self.endpoint = v;
        }
        if let Some(v) = timeout_secs {
            self.timeout_secs = v;
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(&self.endpoint)
            .with_context(|| format!("invalid analysis endpoint '{}'", self.endpoint))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "analysis endpoint '{}' must use http or https",
                self.endpoint
            );
        }
        if self.timeout_secs == 0 {
            bail!("request timeout must be at least one second");
        }
        Ok(())
    }
}

fn parse_file_settings(raw: &str, path: &Path) -> anyhow::Result<FileSettings> {
    toml::from_str(raw).with_context(|| format!("failed to parse config file '{}'", path.display()))
}

/// Defaults, then the config file, then environment variables.
///
/// An explicit `config_path` must exist; the default `radimal.toml` in the
/// working directory is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with(config_path, |key| std::env::var(key).ok())
}

fn load_settings_with(
    config_path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            settings.apply_file(parse_file_settings(&raw, path)?);
        }
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if let Ok(raw) = fs::read_to_string(&path) {
                settings.apply_file(parse_file_settings(&raw, &path)?);
            }
        }
    }

    settings.apply_env(lookup);
    Ok(settings)
}
