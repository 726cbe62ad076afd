use assert_cmd::Command;
use chrono::{Duration, Utc};
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a config and a history file with sample posts
fn create_test_history() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let settings_path = temp_dir.path().join("settings.json");
    let history_path = temp_dir.path().join("posts-history.json");

    fs::write(
        &config_path,
        format!(
            "[storage]\nsettings_path = \"{}\"\nhistory_path = \"{}\"\n",
            settings_path.display().to_string().replace('\\', "/"),
            history_path.display().to_string().replace('\\', "/")
        ),
    )
    .unwrap();

    let now = Utc::now();
    let history = json!({
        "posts": [
            {
                "id": "post_1",
                "content": "Check out this trending video: https://youtube.com/watch?v=abc123",
                "videoUrl": "https://youtube.com/watch?v=abc123",
                "timestamp": (now - Duration::days(2)).to_rfc3339(),
                "engagement": {"likes": 3, "retweets": 1, "replies": 0, "clicks": 6}
            },
            {
                "id": "post_2",
                "content": "Dance time\n\n#fyp",
                "videoUrl": "https://tiktok.com/@user/video/123456",
                "affiliateLink": "https://aff.example/?v=https%3A%2F%2Ftiktok.com%2F%40user%2Fvideo%2F123456",
                "timestamp": (now - Duration::days(1)).to_rfc3339(),
                "engagement": {"likes": 9, "retweets": 4, "replies": 2, "clicks": 14}
            },
            {
                "id": "post_3",
                "content": "Check out this trending video: https://youtube.com/watch?v=def456",
                "videoUrl": "https://youtube.com/watch?v=def456",
                "timestamp": now.to_rfc3339(),
                "engagement": {"likes": 0, "retweets": 0, "replies": 0}
            }
        ]
    });
    fs::write(&history_path, serde_json::to_string_pretty(&history).unwrap()).unwrap();

    (temp_dir, config_path)
}

fn trend_history(config_path: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("trend-history").unwrap();
    cmd.env("TRENDCAST_CONFIG", config_path);
    cmd
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_text_output_newest_first() {
    let (_temp_dir, config_path) = create_test_history();

    let output = trend_history(&config_path).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let first = stdout.find("post_3").unwrap();
    let second = stdout.find("post_2").unwrap();
    let third = stdout.find("post_1").unwrap();
    assert!(first < second && second < third);
    assert!(stdout.contains("Dance time #fyp"));
    assert!(stdout.contains("clicks: 14"));
}

#[test]
fn test_json_output_with_limit() {
    let (_temp_dir, config_path) = create_test_history();

    let posts = json_output(trend_history(&config_path).args(["--format", "json", "--limit", "2"]));
    let ids: Vec<_> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["post_3", "post_2"]);
}

#[test]
fn test_jsonl_output_with_search() {
    let (_temp_dir, config_path) = create_test_history();

    let output = trend_history(&config_path)
        .args(["--format", "jsonl", "--search", "YOUTUBE"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let post: Value = serde_json::from_str(line).unwrap();
        assert!(post["videoUrl"].as_str().unwrap().contains("youtube"));
    }
}

#[test]
fn test_since_filter() {
    let (_temp_dir, config_path) = create_test_history();
    let since = (Utc::now() - Duration::hours(36)).to_rfc3339();

    let posts = json_output(trend_history(&config_path).args(["--format", "json", "--since", &since]));
    assert_eq!(posts.as_array().unwrap().len(), 2);
}

#[test]
fn test_invalid_since_fails() {
    let (_temp_dir, config_path) = create_test_history();

    trend_history(&config_path)
        .args(["--since", "last tuesday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date format"));
}

#[test]
fn test_stats_json() {
    let (_temp_dir, config_path) = create_test_history();

    let stats = json_output(trend_history(&config_path).args(["--stats", "--format", "json", "--limit", "2"]));
    assert_eq!(stats["totalPosts"], 3);
    assert_eq!(stats["totalEngagement"]["clicks"], 20);
    let rate = stats["engagementRate"].as_f64().unwrap();
    assert!((rate - 19.0 / 3.0).abs() < 1e-9);
    assert_eq!(stats["topPosts"][0]["id"], "post_2");
    assert_eq!(stats["topPosts"].as_array().unwrap().len(), 2);
}

#[test]
fn test_stats_text() {
    let (_temp_dir, config_path) = create_test_history();

    trend_history(&config_path)
        .arg("--stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total posts:        3"))
        .stdout(predicate::str::contains("Top posts:"));
}

#[test]
fn test_missing_history_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            "[storage]\nsettings_path = \"{}\"\nhistory_path = \"{}\"\n",
            temp_dir.path().join("settings.json").display().to_string().replace('\\', "/"),
            temp_dir.path().join("none.json").display().to_string().replace('\\', "/")
        ),
    )
    .unwrap();

    trend_history(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let posts = json_output(trend_history(&config_path).args(["--format", "json"]));
    assert_eq!(posts, json!([]));
}

#[test]
fn test_trending_uses_default_source() {
    let (_temp_dir, config_path) = create_test_history();

    let videos = json_output(trend_history(&config_path).args(["--trending", "--format", "json"]));
    let videos = videos.as_array().unwrap();
    assert_eq!(videos.len(), 2);
    assert!(videos.iter().all(|v| v["source"] == "youtube"));
}
