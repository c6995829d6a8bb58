// SPDX-License-Identifier: MIT OR Apache-2.0
//! Environment override and schema tests for `relaunch-config`.

use relaunch_config::{
    ENV_ENABLED, ENV_LOG_LEVEL, RelaunchConfig, apply_env_overrides, load_config, validate_config,
};
use serial_test::serial;

/// Sets env vars for the duration of a test and removes them on drop.
struct EnvGuard {
    keys: Vec<&'static str>,
}

impl EnvGuard {
    fn new(pairs: &[(&'static str, &str)]) -> Self {
        let keys: Vec<&'static str> = pairs.iter().map(|(k, _)| *k).collect();
        for (k, v) in pairs {
            // SAFETY: these tests run serially (env vars are process-global).
            unsafe { std::env::set_var(k, v) };
        }
        Self { keys }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for k in &self.keys {
            // SAFETY: restoring env to previous state on drop.
            unsafe { std::env::remove_var(k) };
        }
    }
}

#[test]
#[serial]
fn env_can_disable_relaunching() {
    let _guard = EnvGuard::new(&[(ENV_ENABLED, "false")]);
    let cfg = load_config(None).unwrap();
    assert!(!cfg.enabled);
}

#[test]
#[serial]
fn env_can_reenable_file_disabled_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("relaunch.toml");
    std::fs::write(&path, "enabled = false\n").unwrap();

    let _guard = EnvGuard::new(&[(ENV_ENABLED, "yes")]);
    let cfg = load_config(Some(&path)).unwrap();
    assert!(cfg.enabled);
}

#[test]
#[serial]
fn env_log_level_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("relaunch.toml");
    std::fs::write(&path, "log_level = \"info\"\n").unwrap();

    let _guard = EnvGuard::new(&[(ENV_LOG_LEVEL, "debug")]);
    let cfg = load_config(Some(&path)).unwrap();
    assert_eq!(cfg.log_level.as_deref(), Some("debug"));
}

#[test]
#[serial]
fn unset_env_leaves_defaults() {
    let mut cfg = RelaunchConfig::default();
    apply_env_overrides(&mut cfg);
    assert_eq!(cfg, RelaunchConfig::default());
    assert!(validate_config(&cfg).unwrap().is_empty());
}

#[test]
fn schema_describes_every_field() {
    let schema = schemars::schema_for!(RelaunchConfig);
    let json = serde_json::to_value(&schema).unwrap();
    let props = json["properties"].as_object().expect("properties object");
    for field in ["enabled", "log_level", "extra_value_options"] {
        assert!(props.contains_key(field), "schema is missing '{field}'");
    }
}

#[test]
fn serialized_default_omits_empty_options() {
    let json = serde_json::to_string(&RelaunchConfig::default()).unwrap();
    assert!(!json.contains("extra_value_options"));
    assert!(json.contains("\"enabled\":true"));
}
