//! CLI integration tests for trend-settings

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct TestEnv {
    temp_dir: TempDir,
    config_path: PathBuf,
    settings_path: PathBuf,
}

fn setup_test_env() -> TestEnv {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let settings_path = temp_dir.path().join("data").join("settings.json");

    fs::write(
        &config_path,
        format!(
            "[storage]\nsettings_path = \"{}\"\nhistory_path = \"{}\"\n",
            settings_path.display().to_string().replace('\\', "/"),
            temp_dir
                .path()
                .join("data")
                .join("posts-history.json")
                .display()
                .to_string()
                .replace('\\', "/")
        ),
    )
    .unwrap();

    TestEnv {
        temp_dir,
        config_path,
        settings_path,
    }
}

fn trend_settings(env: &TestEnv) -> Command {
    let mut cmd = Command::cargo_bin("trend-settings").unwrap();
    cmd.env("TRENDCAST_CONFIG", &env.config_path);
    cmd
}

const VALID: &str = r##"{
    "twitterUsername": "operator",
    "twitterPassword": "hunter2",
    "apiSecretKey": "api-secret",
    "accessToken": "token-123",
    "affiliateLink": "https://aff.example/?v={{videoUrl}}",
    "autoPostEnabled": true,
    "contentSources": ["youtube", "tiktok"],
    "hashtagGroups": ["#viral #fyp", "#trending"],
    "postFrequency": 60
}"##;

#[test]
fn test_set_from_file_then_show_masked() {
    let env = setup_test_env();
    let input = env.temp_dir.path().join("input.json");
    fs::write(&input, VALID).unwrap();

    trend_settings(&env)
        .arg("set")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings saved"));

    let stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&env.settings_path).unwrap()).unwrap();
    assert_eq!(stored["twitterPassword"], "hunter2");

    let output = trend_settings(&env)
        .args(["show", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["twitterUsername"], "operator");
    assert_eq!(shown["twitterPassword"], "********");
    assert_eq!(shown["apiSecretKey"], "********");
    assert_eq!(shown["accessToken"], "token-123");
    assert_eq!(shown["postFrequency"], 60);
}

#[test]
fn test_show_text_never_prints_password() {
    let env = setup_test_env();
    fs::create_dir_all(env.settings_path.parent().unwrap()).unwrap();
    fs::write(&env.settings_path, VALID).unwrap();

    trend_settings(&env)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Twitter username:    operator"))
        .stdout(predicate::str::contains("#viral #fyp"))
        .stdout(predicate::str::contains("hunter2").not())
        .stdout(predicate::str::contains("api-secret").not());
}

#[test]
fn test_show_defaults_when_missing() {
    let env = setup_test_env();

    trend_settings(&env)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Auto-post:           disabled"))
        .stdout(predicate::str::contains("youtube (default)"));
}

#[test]
fn test_set_from_stdin() {
    let env = setup_test_env();

    trend_settings(&env)
        .args(["set", "-"])
        .write_stdin(r#"{"analyticsEnabled": true}"#)
        .assert()
        .success();

    let stored = fs::read_to_string(&env.settings_path).unwrap();
    assert!(stored.contains("\"analyticsEnabled\": true"));
}

#[test]
fn test_set_rejects_auto_post_without_affiliate_link() {
    let env = setup_test_env();

    trend_settings(&env)
        .args(["set", "-"])
        .write_stdin(
            r#"{"autoPostEnabled": true, "twitterUsername": "u", "twitterPassword": "p"}"#,
        )
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Affiliate link is required for auto-posting."));

    assert!(!env.settings_path.exists());
}

#[test]
fn test_set_rejects_auto_post_without_credentials() {
    let env = setup_test_env();

    trend_settings(&env)
        .args(["set", "-"])
        .write_stdin(r#"{"autoPostEnabled": true, "affiliateLink": "https://aff?v={{videoUrl}}"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Twitter credentials are required for auto-posting."));
}

#[test]
fn test_set_invalid_json_exit_code() {
    let env = setup_test_env();

    trend_settings(&env)
        .args(["set", "-"])
        .write_stdin("{ not json")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("not valid JSON"));
}
