//! Integration tests for the trend-send daemon

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct TestEnv {
    _temp_dir: TempDir,
    config_path: PathBuf,
    settings_path: PathBuf,
    history_path: PathBuf,
}

/// Setup test environment with a config file pointing into a temp dir
fn setup_test_env(settings: Option<&str>) -> TestEnv {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let settings_path = temp_dir.path().join("data").join("settings.json");
    let history_path = temp_dir.path().join("data").join("posts-history.json");

    let config_content = format!(
        r#"
[storage]
settings_path = "{}"
history_path = "{}"

[scheduler]
interval = "1s"

[network]
request_timeout = "5s"
"#,
        settings_path.display().to_string().replace('\\', "/"),
        history_path.display().to_string().replace('\\', "/")
    );
    fs::write(&config_path, config_content).unwrap();

    if let Some(settings) = settings {
        fs::create_dir_all(settings_path.parent().unwrap()).unwrap();
        fs::write(&settings_path, settings).unwrap();
    }

    TestEnv {
        _temp_dir: temp_dir,
        config_path,
        settings_path,
        history_path,
    }
}

fn trend_send(env: &TestEnv) -> Command {
    let mut cmd = Command::cargo_bin("trend-send").unwrap();
    cmd.env("TRENDCAST_CONFIG", &env.config_path)
        .env_remove("TRENDCAST_AUTO_POST_INTERVAL_MINUTES")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_describes_jobs() {
    Command::cargo_bin("trend-send")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("auto-post"))
        .stdout(predicate::str::contains("--once"));
}

#[test]
fn test_once_with_auto_post_enabled_records_a_post() {
    let env = setup_test_env(Some(
        r##"{
            "autoPostEnabled": true,
            "analyticsEnabled": true,
            "affiliateLink": "https://aff.example/?v={{videoUrl}}",
            "twitterUsername": "operator",
            "twitterPassword": "secret",
            "hashtagGroups": ["#viral #fyp"]
        }"##,
    ));

    trend_send(&env).arg("--once").assert().success();

    let history: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&env.history_path).unwrap()).unwrap();
    let posts = history["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);

    let post = &posts[0];
    let video_url = post["videoUrl"].as_str().unwrap();
    assert!(video_url.starts_with("https://youtube.com/watch?v="));
    let affiliate = post["affiliateLink"].as_str().unwrap();
    assert!(affiliate.starts_with("https://aff.example/?v=https%3A%2F%2Fyoutube.com"));
    assert!(post["content"].as_str().unwrap().contains("#viral #fyp"));
}

#[test]
fn test_once_when_disabled_leaves_no_history() {
    let env = setup_test_env(Some(r#"{"autoPostEnabled": false}"#));

    trend_send(&env).arg("--once").assert().success();

    assert!(!env.history_path.exists());
    assert!(env.settings_path.exists());
}

#[test]
fn test_once_without_settings_creates_storage_dir() {
    let env = setup_test_env(None);

    trend_send(&env).arg("--once").assert().success();

    assert!(env.settings_path.parent().unwrap().is_dir());
    assert!(!env.history_path.exists());
}

#[test]
fn test_invalid_interval_env_is_rejected() {
    let env = setup_test_env(None);

    trend_send(&env)
        .env("TRENDCAST_AUTO_POST_INTERVAL_MINUTES", "soon")
        .arg("--once")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("TRENDCAST_AUTO_POST_INTERVAL_MINUTES"));
}

#[test]
fn test_zero_interval_flag_is_rejected() {
    let env = setup_test_env(None);

    trend_send(&env)
        .args(["--interval", "0", "--once"])
        .assert()
        .failure();
}
