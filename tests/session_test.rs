#[path = "common/mod.rs"]
mod common;

use common::HubTest;

const ADMIN_ENV: &[(&str, &str)] = &[
    ("DIGIHUB_ADMIN_ID", "admin"),
    ("DIGIHUB_ADMIN_PW", "s3cret"),
];

#[test]
fn test_whoami_defaults_to_anonymous() {
    let hub = HubTest::new();

    let json = hub.run_json(&["whoami"]);
    assert_eq!(json["tier"], "anonymous");
}

#[test]
fn test_login_and_logout() {
    let hub = HubTest::new();

    let output = hub.run_with_env(&["login", "admin", "--password", "s3cret"], ADMIN_ENV);
    assert!(
        output.status.success(),
        "login failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(hub.file_exists("session.json"));

    let json = hub.run_json(&["whoami"]);
    assert_eq!(json["tier"], "admin");
    assert!(json["since"].is_string());

    let json = hub.run_json(&["logout"]);
    assert_eq!(json["logged_out"], true);
    assert!(!hub.file_exists("session.json"));
}

#[test]
fn test_login_wrong_password() {
    let hub = HubTest::new();

    let output = hub.run_with_env(&["login", "admin", "--password", "guess"], ADMIN_ENV);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("wrong id or password"));
    assert!(!hub.file_exists("session.json"));
}

#[test]
fn test_login_disabled_without_credentials() {
    let hub = HubTest::new();

    let stderr = hub.run_failure(&["login", "admin", "--password", "s3cret"]);
    assert!(stderr.contains("admin login is disabled"));
}

#[test]
fn test_password_is_not_stored() {
    let hub = HubTest::new();

    hub.run_with_env(&["login", "admin", "--password", "s3cret"], ADMIN_ENV);
    let session = hub.read_file("session.json").unwrap();
    assert!(!session.contains("s3cret"));
}
