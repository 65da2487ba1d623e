#[path = "common/mod.rs"]
mod common;

use common::HubTest;

// Nothing listens on the discard port, so reads fail fast and the
// synchronizer falls back to its (empty) last snapshot.
const CSV_ONLY_CONFIG: &str = r#"
remote:
  csv_url: http://127.0.0.1:9/assets.csv
  source: csv
  timeout: 5
"#;

#[test]
fn test_ls_runs_with_only_csv_export_configured() {
    let hub = HubTest::new();
    hub.write_config(CSV_ONLY_CONFIG);

    let json = hub.run_json(&["ls"]);
    assert_eq!(json["category"], "ALL");
    assert_eq!(json["count"], 0);
    assert!(json["stale"].is_string(), "unreachable export is reported: {json}");
    assert!(json["fetched_at"].is_null());
}

#[test]
fn test_ls_without_any_source_needs_endpoint() {
    let hub = HubTest::new();

    let stderr = hub.run_failure(&["ls"]);
    assert!(stderr.contains("remote endpoint not configured"));
}

#[test]
fn test_csv_only_writes_report_missing_endpoint() {
    let hub = HubTest::new();
    hub.write_config(CSV_ONLY_CONFIG);
    hub.login_as_admin();

    let stderr = hub.run_failure(&["asset", "rm", "17"]);
    assert!(stderr.contains("remote endpoint not configured"));
}
