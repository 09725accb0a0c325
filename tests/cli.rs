use assert_cmd::Command;
use predicates::prelude::*;

fn yt_transcript() -> Command {
    let mut cmd = Command::cargo_bin("yt-transcript").unwrap();
    cmd.env_remove("HTTP_PROXY").env_remove("HTTPS_PROXY");
    cmd
}

#[test]
fn test_help_lists_commands() {
    yt_transcript()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_fetch_help_shows_language_options() {
    yt_transcript()
        .args(["fetch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--languages"))
        .stdout(predicate::str::contains("--exclude-generated"))
        .stdout(predicate::str::contains("--translate"));
}

#[test]
fn test_fetch_requires_video_ids() {
    yt_transcript()
        .arg("fetch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("VIDEO_ID"));
}

#[test]
fn test_fetch_with_cookies_is_rejected() {
    yt_transcript()
        .args(["fetch", "dQw4w9WgXcQ", "--cookies", "cookies.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported feature"));
}

#[test]
fn test_list_with_cookies_is_rejected() {
    yt_transcript()
        .args(["list", "dQw4w9WgXcQ", "--cookies", "cookies.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported feature"));
}

#[test]
fn test_unknown_format_is_rejected() {
    yt_transcript()
        .args(["fetch", "dQw4w9WgXcQ", "--format", "csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("csv"));
}

#[test]
fn test_cookies_checked_before_video_ids() {
    yt_transcript()
        .args(["fetch", "not an id!", "--cookies", "cookies.txt", "--fail-fast"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported feature"));
}

#[test]
fn test_invalid_video_id_is_reported_as_failure() {
    yt_transcript()
        .args(["fetch", "not an id!"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an id!"))
        .stderr(predicate::str::contains("1 of 1 videos could not be retrieved"));
}
