#[path = "common/mod.rs"]
mod common;

use common::HubTest;

#[test]
fn test_fav_toggle_adds_then_removes() {
    let hub = HubTest::new();

    let json = hub.run_json(&["fav", "toggle", "1769047016976"]);
    assert_eq!(json["favorite"], true);
    assert_eq!(
        hub.read_file("favorites.json").unwrap(),
        r#"["1769047016976"]"#
    );

    let json = hub.run_json(&["fav", "toggle", "1769047016976"]);
    assert_eq!(json["favorite"], false);
    assert_eq!(hub.read_file("favorites.json").unwrap(), "[]");
}

#[test]
fn test_fav_ls_reads_existing_file() {
    let hub = HubTest::new();
    hub.write_file("favorites.json", r#"["3", 12]"#);

    let json = hub.run_json(&["fav", "ls"]);
    assert_eq!(json["favorites"], serde_json::json!(["12", "3"]));
    assert!(
        json["file"]
            .as_str()
            .unwrap()
            .ends_with("favorites.json")
    );
}

#[test]
fn test_fav_ls_empty() {
    let hub = HubTest::new();

    let output = hub.run_success(&["fav", "ls"]);
    assert!(output.contains("No favorites yet"));
}

#[test]
fn test_fav_toggle_rejects_blank_id() {
    let hub = HubTest::new();

    let stderr = hub.run_failure(&["fav", "toggle", " "]);
    assert!(stderr.contains("cannot be empty"));
    assert!(!hub.file_exists("favorites.json"));
}
