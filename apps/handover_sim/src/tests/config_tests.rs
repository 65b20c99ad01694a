use super::*;

use std::{
    env,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

fn no_env(_: &str) -> Option<String> {
    None
}

fn temp_config(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("handover_sim_config_test_{suffix}.toml"));
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn missing_file_keeps_defaults() {
    let settings = load_settings_with_env(Path::new("/nonexistent/handover.toml"), no_env);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.sequencer_config(), SequencerConfig::default());
}

#[test]
fn file_values_override_defaults() {
    let path = temp_config(
        r#"
remote_enable_delay_ms = 4500
local_enable_timeout_ms = "8000"
failure_message = "Beam did not complete."
"#,
    );

    let settings = load_settings_with_env(&path, no_env);
    assert_eq!(settings.remote_enable_delay_ms, 4500);
    assert_eq!(settings.local_enable_timeout_ms, Some(8000));
    assert_eq!(settings.failure_message, "Beam did not complete.");

    let config = settings.sequencer_config();
    assert_eq!(config.remote_enable_delay, Duration::from_millis(4500));
    assert_eq!(config.local_enable_timeout, Some(Duration::from_secs(8)));

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn environment_overrides_file() {
    let path = temp_config("remote_enable_delay_ms = 4500\n");

    let settings = load_settings_with_env(&path, |key| match key {
        "APP__REMOTE_ENABLE_DELAY_MS" => Some("1500".into()),
        "HANDOVER_FAILURE_MESSAGE" => Some("Try again".into()),
        _ => None,
    });
    assert_eq!(settings.remote_enable_delay_ms, 1500);
    assert_eq!(settings.failure_message, "Try again");

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn unparseable_values_are_ignored() {
    let path = temp_config("remote_enable_delay_ms = -5\n");

    let settings = load_settings_with_env(&path, |key| match key {
        "HANDOVER_LOCAL_ENABLE_TIMEOUT_MS" => Some("soon".into()),
        _ => None,
    });
    assert_eq!(settings.remote_enable_delay_ms, 3000);
    assert_eq!(settings.local_enable_timeout_ms, None);

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn zero_timeout_means_wait_forever() {
    let settings = Settings {
        local_enable_timeout_ms: Some(0),
        ..Settings::default()
    };
    assert_eq!(settings.sequencer_config().local_enable_timeout, None);
}
