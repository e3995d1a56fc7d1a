#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

#[test]
fn test_help_lists_commands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("mediascrape");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("episodes"))
        .stdout(predicate::str::contains("--no-fallback"));
}

#[test]
fn test_search_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("mediascrape");
    cmd.args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--query"))
        .stdout(predicate::str::contains("--year"));
}

#[test]
fn test_search_missing_query() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("mediascrape");
    cmd.args(["search", "--kind", "tv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query"));
}

#[test]
fn test_search_rejects_episode_kind() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("mediascrape");
    cmd.args(["search", "--query", "Dark", "--kind", "episode"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_unknown_language_rejected() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("mediascrape");
    cmd.args(["search", "--query", "Dark", "--kind", "tv", "--language", "xx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown language code"));
}

#[test]
fn test_scrape_episode_requires_season() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("mediascrape");
    cmd.env_remove("TMDB_API_TOKEN")
        .args(["scrape", "--id", "70523", "--kind", "episode", "--episode", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--season is required"));
}

#[test]
fn test_scrape_episode_requires_number_or_air_date() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("mediascrape");
    cmd.env_remove("TMDB_API_TOKEN")
        .args(["scrape", "--id", "70523", "--kind", "episode", "--season", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--episode or --aired"));
}

#[test]
fn test_missing_token() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("mediascrape");
    cmd.env_remove("TMDB_API_TOKEN")
        .args(["--dir", dir.path().to_str().unwrap()])
        .args(["search", "--query", "Dark", "--kind", "tv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB_API_TOKEN"));
}

#[test]
fn test_invalid_config_reported() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[scraper]\nlanguage = \"klingon\"\n",
    )
    .unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("mediascrape");
    cmd.env("TMDB_API_TOKEN", "dummy")
        .args(["--dir", dir.path().to_str().unwrap()])
        .args(["episodes", "--id", "70523"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn test_batch_requires_ids() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("mediascrape");
    cmd.args(["batch", "--kind", "movie"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--ids"));
}
