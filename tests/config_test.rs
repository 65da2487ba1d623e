#[path = "common/mod.rs"]
mod common;

use common::HubTest;

// ============================================================================
// Config command tests
// ============================================================================

#[test]
fn test_config_show_empty() {
    let hub = HubTest::new();

    let output = hub.run_success(&["config", "show"]);
    assert!(output.contains("Configuration"));
    assert!(output.contains("not configured"));
}

#[test]
fn test_config_set_and_get_endpoint() {
    let hub = HubTest::new();

    hub.run_success(&[
        "config",
        "set",
        "remote.endpoint",
        "https://script.example.com/macros/s/abc/exec",
    ]);
    let output = hub.run_success(&["config", "get", "remote.endpoint"]);
    assert_eq!(output.trim(), "https://script.example.com/macros/s/abc/exec");
}

#[test]
fn test_config_show_masks_endpoint() {
    let hub = HubTest::new();
    hub.write_config("remote:\n  endpoint: https://script.example.com/macros/s/abc/exec\n");

    let json = hub.run_json(&["config", "show"]);
    let shown = json["values"]["remote.endpoint"].as_str().unwrap();
    assert!(shown.contains("..."));
    assert!(!shown.contains("/abc/"));
    assert_eq!(json["auth"]["admin_credentials_configured"], false);
}

#[test]
fn test_config_env_endpoint_overrides_file() {
    let hub = HubTest::new();
    hub.write_config("remote:\n  endpoint: https://file.example.com/exec\n");

    let output = hub.run_with_env(
        &["config", "get", "remote.endpoint"],
        &[("DIGIHUB_ENDPOINT", "https://env.example.com/exec")],
    );
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "https://env.example.com/exec"
    );
}

#[test]
fn test_config_get_not_set() {
    let hub = HubTest::new();

    let stderr = hub.run_failure(&["config", "get", "user.email"]);
    assert!(stderr.contains("not set"));
}

#[test]
fn test_config_get_defaults() {
    let hub = HubTest::new();

    assert_eq!(hub.run_success(&["config", "get", "remote.timeout"]).trim(), "30");
    assert_eq!(
        hub.run_success(&["config", "get", "sync.refresh_delay_ms"]).trim(),
        "2000"
    );
    assert_eq!(hub.run_success(&["config", "get", "order.policy"]).trim(), "lenient");
}

#[test]
fn test_config_set_invalid_key() {
    let hub = HubTest::new();

    let stderr = hub.run_failure(&["config", "set", "invalid.key", "value"]);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_config_set_rejects_bad_values() {
    let hub = HubTest::new();

    let stderr = hub.run_failure(&["config", "set", "remote.endpoint", "not a url"]);
    assert!(stderr.contains("invalid URL"));

    let stderr = hub.run_failure(&["config", "set", "order.policy", "strict"]);
    assert!(stderr.contains("lenient"));

    let stderr = hub.run_failure(&["config", "set", "sync.refresh_delay_ms", "soon"]);
    assert!(stderr.contains("whole number"));
}

#[test]
fn test_config_file_created() {
    let hub = HubTest::new();

    hub.run_success(&["config", "set", "order.policy", "complete"]);
    hub.run_success(&["config", "set", "user.email", "kim@example.com"]);

    let content = hub.read_file("config.yaml").expect("Config file should be created");
    assert!(content.contains("complete"));
    assert!(content.contains("kim@example.com"));
}

#[test]
fn test_config_rejects_underscore_keys() {
    let hub = HubTest::new();

    let stderr = hub.run_failure(&["config", "set", "user_email", "kim@example.com"]);
    assert!(stderr.contains("invalid config key"));
    assert!(stderr.contains("user.email"));
}
