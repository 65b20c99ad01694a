use std::{collections::HashMap, fs, path::Path, time::Duration};

use handover_core::{SequencerConfig, DEFAULT_FAILURE_MESSAGE, REMOTE_ENABLE_DELAY};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub remote_enable_delay_ms: u64,
    pub local_enable_timeout_ms: Option<u64>,
    pub failure_message: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            remote_enable_delay_ms: REMOTE_ENABLE_DELAY.as_millis() as u64,
            local_enable_timeout_ms: None,
            failure_message: DEFAULT_FAILURE_MESSAGE.into(),
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn sequencer_config(&self) -> SequencerConfig {
        SequencerConfig {
            remote_enable_delay: Duration::from_millis(self.remote_enable_delay_ms),
            local_enable_timeout: self
                .local_enable_timeout_ms
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
            failure_message: self.failure_message.clone(),
        }
    }
}

pub fn load_settings(path: &Path) -> Settings {
    load_settings_with_env(path, |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file at `path` if it exists, then environment.
pub fn load_settings_with_env(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => apply_file_settings(&mut settings, &file_cfg),
            Err(err) => warn!("config: ignoring unreadable '{}': {err}", path.display()),
        }
    }

    for key in [
        "HANDOVER_REMOTE_ENABLE_DELAY_MS",
        "APP__REMOTE_ENABLE_DELAY_MS",
    ] {
        if let Some(ms) = env(key).as_deref().and_then(parse_millis) {
            settings.remote_enable_delay_ms = ms;
        }
    }

    for key in [
        "HANDOVER_LOCAL_ENABLE_TIMEOUT_MS",
        "APP__LOCAL_ENABLE_TIMEOUT_MS",
    ] {
        if let Some(ms) = env(key).as_deref().and_then(parse_millis) {
            settings.local_enable_timeout_ms = Some(ms);
        }
    }

    if let Some(v) = env("HANDOVER_FAILURE_MESSAGE") {
        settings.failure_message = v;
    }

    if let Some(v) = env("HANDOVER_LOG") {
        settings.log_filter = v;
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, file_cfg: &HashMap<String, toml::Value>) {
    if let Some(ms) = file_cfg.get("remote_enable_delay_ms").and_then(value_millis) {
        settings.remote_enable_delay_ms = ms;
    }
    if let Some(ms) = file_cfg.get("local_enable_timeout_ms").and_then(value_millis) {
        settings.local_enable_timeout_ms = Some(ms);
    }
    if let Some(v) = file_cfg.get("failure_message").and_then(toml::Value::as_str) {
        settings.failure_message = v.to_string();
    }
    if let Some(v) = file_cfg.get("log_filter").and_then(toml::Value::as_str) {
        settings.log_filter = v.to_string();
    }
}

fn value_millis(value: &toml::Value) -> Option<u64> {
    match value {
        toml::Value::Integer(ms) => u64::try_from(*ms).ok(),
        toml::Value::String(raw) => parse_millis(raw),
        _ => None,
    }
}

fn parse_millis(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
