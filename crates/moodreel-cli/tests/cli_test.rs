#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;
use serde_json::json;

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moodreel");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("moods"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("interactive"));
}

#[test]
fn test_moods_lists_every_mood() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moodreel");
    cmd.arg("moods")
        .assert()
        .success()
        .stdout(predicate::str::contains("Calm & Cozy"))
        .stdout(predicate::str::contains("edge-of-your-seat"))
        .stdout(predicate::str::contains("Dark & Moody"));
}

#[test]
fn test_prompt_with_mood() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moodreel");
    cmd.args(["prompt", "cozy evening", "--mood", "feel-good"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cozy evening"))
        .stdout(predicate::str::contains("Feel-Good"));
}

#[test]
fn test_prompt_too_short() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moodreel");
    cmd.args(["prompt", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 2 characters"));
}

#[test]
fn test_unknown_mood_rejected() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moodreel");
    cmd.args(["search", "cozy evening", "--mood", "grumpy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown mood"));
}

#[test]
fn test_search_too_short() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("moodreel");
    cmd.args(["search", " a "])
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 2 characters"));
}

#[test]
fn test_search_without_credential() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("moodreel");
    cmd.args(["search", "heist thriller"])
        .arg("--dir")
        .arg(dir.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Add an OpenAI API key to enable AI-powered recommendations.",
        ));
}

#[test]
fn test_invalid_config_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[provider\n").unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("moodreel");
    cmd.args(["search", "heist thriller"])
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
}

#[test]
fn test_interactive_toggles_mood_and_quits() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("moodreel");
    cmd.arg("interactive")
        .arg("--dir")
        .arg(dir.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .write_stdin(":mood nostalgic\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mood: Nostalgic"));
}

#[tokio::test]
async fn test_search_against_mock_provider() {
    // Arrange
    let mock_server = wiremock::MockServer::start().await;
    let content = json!({
        "recommendations": [
            { "title": "Heat", "year": 1995, "genres": ["Crime"], "runtimeMinutes": 170 },
            { "title": "Inside Man", "synopsis": "A bank heist turns into a standoff." }
        ]
    });
    let body = json!({
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content.to_string() } }
        ]
    });

    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .and(wiremock::matchers::path("/v1/chat/completions"))
        .and(wiremock::matchers::header("Authorization", "Bearer sk-file"))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        format!(
            "[provider]\napi_key = \"sk-file\"\nbase_url = \"{}/v1/\"\n\n[search]\ndebounce_ms = 0\n",
            mock_server.uri()
        ),
    )
    .unwrap();

    // Act
    let dir_path = dir.path().to_path_buf();
    let assert = tokio::task::spawn_blocking(move || {
        let mut cmd = cargo_bin_cmd!("moodreel");
        cmd.args(["search", "heist thriller"])
            .arg("--dir")
            .arg(&dir_path)
            .env_remove("OPENAI_API_KEY")
            .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
            .assert()
    })
    .await
    .unwrap();

    // Assert
    assert
        .success()
        .stdout(predicate::str::contains("Top pick: Heat"))
        .stdout(predicate::str::contains("1995 · Crime · 170 min"))
        .stdout(predicate::str::contains("Also consider: Inside Man"));
}
