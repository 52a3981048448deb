//! End-to-end tests for the `lancer` binary.
//!
//! Each test runs in its own temp directory with storage and config
//! discovery pointed inside it.

use std::fs;
use std::path::Path;

use anyhow::Result;
use predicates::str::contains;
use pretty_assertions::assert_eq;
use serde_json::Value as JsonValue;
use serde_json::json;
use tempfile::TempDir;

fn lancer(home: &Path) -> Result<assert_cmd::Command> {
    let mut cmd = assert_cmd::Command::cargo_bin("lancer")?;
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("LANCER_STORAGE__PATH", home.join("storage.json"))
        .env("RUST_LOG", "warn");
    Ok(cmd)
}

fn write_json(dir: &Path, name: &str, value: &JsonValue) -> Result<std::path::PathBuf> {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value)?)?;
    Ok(path)
}

fn stdout_json(output: &std::process::Output) -> Result<JsonValue> {
    Ok(serde_json::from_slice(&output.stdout)?)
}

#[test]
fn stats_derives_snapshot_from_file() -> Result<()> {
    let home = TempDir::new()?;
    let file = write_json(
        home.path(),
        "workspace.json",
        &json!({
            "workspace": {
                "_id": "ws-1",
                "sharedMilestones": [
                    { "title": "Design", "amount": 100, "status": "completed", "completedDate": "2026-10-14T10:00:00Z" },
                    { "title": "Build", "amount": 50, "status": "awaiting_approval" },
                    { "title": "Launch", "amount": 75, "status": "pending" }
                ],
                "sharedMessages": [
                    { "senderRole": "client", "readBy": ["client"], "createdAt": "2026-10-15T09:00:00Z" },
                    { "senderRole": "client", "readBy": ["freelancer"] },
                    { "senderRole": "freelancer" }
                ],
                "sharedFiles": []
            }
        }),
    )?;

    let output = lancer(home.path())?
        .args(["stats", "--file"])
        .arg(&file)
        .args(["--now", "2026-10-15T12:00:00Z"])
        .output()?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stats = stdout_json(&output)?;
    assert_eq!(stats["workspaceId"], json!("ws-1"));
    assert_eq!(stats["progress"], json!(33));
    assert_eq!(stats["earnings"]["total"], json!(100.0));
    assert_eq!(stats["earnings"]["pending"], json!(50.0));
    assert_eq!(stats["earnings"]["upcoming"], json!(75.0));
    assert_eq!(stats["messages"]["unread"], json!(1));
    assert_eq!(stats["recentActivity"].as_array().map(Vec::len), Some(2));
    assert_eq!(stats["quickActions"][0]["kind"], json!("submitWork"));
    assert_eq!(stats["quickActions"][0]["description"], json!("Launch"));
    Ok(())
}

#[test]
fn profile_import_then_show() -> Result<()> {
    let home = TempDir::new()?;
    let payload = write_json(
        home.path(),
        "profile.json",
        &json!({
            "profile": {
                "name": "Ada Lovelace",
                "title": "Rust Engineer",
                "bio": "Analytical engines.",
                "location": "London",
                "hourlyRate": 85,
                "email": "ada@example.com"
            },
            "skills": ["Rust", "Math"]
        }),
    )?;

    let output = lancer(home.path())?
        .args(["profile", "import"])
        .arg(&payload)
        .output()?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let imported = stdout_json(&output)?;
    assert_eq!(imported["redirect"], json!("/freelancer/dashboard"));
    assert_eq!(imported["payload"]["profile"]["hourlyRate"], json!(85.0));

    let output = lancer(home.path())?.args(["profile", "show"]).output()?;
    assert!(output.status.success());
    let shown = stdout_json(&output)?;
    assert_eq!(shown["stored"], json!(true));
    assert_eq!(shown["submitted"], json!(true));
    assert_eq!(shown["schemaVersion"], json!(2));
    assert_eq!(shown["migrated"], json!(false));
    assert_eq!(shown["profile"]["displayName"], json!("Ada Lovelace"));
    assert_eq!(shown["profile"]["rateLabel"], json!("$85/hr"));
    Ok(())
}

#[test]
fn incomplete_profile_is_refused() -> Result<()> {
    let home = TempDir::new()?;
    let payload = write_json(
        home.path(),
        "profile.json",
        &json!({ "profile": { "name": "Ada", "title": "Engineer" } }),
    )?;

    lancer(home.path())?
        .args(["profile", "import"])
        .arg(&payload)
        .assert()
        .failure()
        .stderr(contains("Please complete the required fields: bio"));

    assert!(!home.path().join("storage.json").exists());
    Ok(())
}

#[test]
fn show_without_stored_profile() -> Result<()> {
    let home = TempDir::new()?;
    let output = lancer(home.path())?.args(["profile", "show"]).output()?;
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)?, json!({ "stored": false, "submitted": false }));
    Ok(())
}

#[test]
fn services_search_filters_and_sorts() -> Result<()> {
    let home = TempDir::new()?;
    let file = write_json(
        home.path(),
        "services.json",
        &json!({ "services": [
            { "_id": "a", "title": "API build", "category": "Development", "price": 900 },
            { "_id": "b", "title": "Logo", "category": "Design", "price": 150 },
            { "_id": "c", "title": "Code review", "category": "Development", "price": 300 }
        ]}),
    )?;

    let output = lancer(home.path())?
        .args(["services", "search", "--file"])
        .arg(&file)
        .args(["--category", "development", "--sort", "price-asc"])
        .output()?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let body = stdout_json(&output)?;
    let ids: Vec<&str> = body["results"]
        .as_array()
        .map(|results| results.iter().filter_map(|r| r["id"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec!["c", "a"]);
    assert_eq!(body["total"], json!(3));
    assert_eq!(body["facets"][0], json!({ "name": "Development", "count": 2 }));
    Ok(())
}

#[test]
fn unknown_sort_order_is_a_usage_error() -> Result<()> {
    let home = TempDir::new()?;
    lancer(home.path())?
        .args(["services", "search", "--file", "x.json", "--sort", "cheapest"])
        .assert()
        .failure()
        .stderr(contains("unknown sort order"));
    Ok(())
}

#[test]
fn explicit_missing_config_file_fails() -> Result<()> {
    let home = TempDir::new()?;
    lancer(home.path())?
        .args(["--config", "nope.toml", "profile", "show"])
        .assert()
        .failure()
        .stderr(contains("configuration file not found"));
    Ok(())
}

#[test]
fn discovered_config_file_is_used() -> Result<()> {
    let home = TempDir::new()?;
    fs::write(home.path().join("lancer.toml"), "[activity]\nlimit = 1\n")?;
    let file = write_json(
        home.path(),
        "workspace.json",
        &json!({ "sharedFiles": [
            { "name": "a", "uploadedAt": "2026-10-15T08:00:00Z" },
            { "name": "b", "uploadedAt": "2026-10-15T09:00:00Z" }
        ]}),
    )?;

    let output = lancer(home.path())?
        .args(["stats", "--file"])
        .arg(&file)
        .args(["--now", "2026-10-15T12:00:00Z"])
        .output()?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stats = stdout_json(&output)?;
    assert_eq!(stats["recentActivity"].as_array().map(Vec::len), Some(1));
    assert_eq!(stats["recentActivity"][0]["detail"], json!("b"));
    Ok(())
}
