use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const TRANSCRIPT: &str = r#"[
  {"id": "u1", "role": "user", "content": "Where are the install docs?", "date": "2024-05-01T10:00:00Z"},
  {"id": "t1", "role": "tool", "content": "{\"citations\":[{\"title\":\"Install\",\"filepath\":\"docs/install.md\"}]}"},
  {"id": "a1", "role": "assistant", "content": "See the install guide.", "end_turn": true}
]"#;

fn write_transcript(dir: &TempDir) -> std::path::PathBuf {
  let path = dir.path().join("transcript.json");
  fs::write(&path, TRANSCRIPT).unwrap();
  path
}

fn feedback_cmd() -> Command {
  let mut cmd = Command::cargo_bin("feedback").unwrap();
  cmd.env_remove("FEEDBACK_SERVER_URL").env_remove("FEEDBACK_TIMEOUT_SECS").env("NO_COLOR", "1");
  cmd
}

#[test]
fn test_preview_prints_seeded_record() {
  let temp = TempDir::new().unwrap();
  let transcript = write_transcript(&temp);

  feedback_cmd()
    .args(["preview", "--transcript"])
    .arg(&transcript)
    .args(["--index", "2"])
    .assert()
    .success()
    .stdout(predicate::str::contains(r#""question_id": "u1""#))
    .stdout(predicate::str::contains(r#""answer": "See the install guide.""#))
    .stdout(predicate::str::contains(r#""filepath": "docs/install.md""#))
    .stdout(predicate::str::contains(r#""case_number": null"#));
}

#[test]
fn test_preview_missing_transcript_fails() {
  let temp = TempDir::new().unwrap();

  feedback_cmd()
    .args(["preview", "--transcript"])
    .arg(temp.path().join("missing.json"))
    .args(["--index", "1"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to read transcript"));
}

#[test]
fn test_submit_rejects_out_of_range_rating() {
  let temp = TempDir::new().unwrap();
  let transcript = write_transcript(&temp);

  feedback_cmd()
    .args(["submit", "--transcript"])
    .arg(&transcript)
    .args(["--index", "2", "--response-quality", "6"])
    .assert()
    .failure();
}

#[test]
fn test_submit_posts_edited_record() {
  let temp = TempDir::new().unwrap();
  let transcript = write_transcript(&temp);
  let mut server = mockito::Server::new();

  let mock = server
    .mock("POST", "/feedback")
    .match_header("content-type", "application/json")
    .match_body(mockito::Matcher::PartialJson(serde_json::json!({
      "question_id": "u1",
      "answer_id": "a1",
      "overall_response_quality": 2,
      "overall_document_quality": 3,
      "verbatim": "Link was broken",
      "too_short": true,
      "missing_info": true,
      "fantastic": false,
      "top_docs": [{"title": "Install", "filepath": "docs/install.md"}],
    })))
    .with_status(201)
    .expect(1)
    .create();

  feedback_cmd()
    .args(["submit", "--transcript"])
    .arg(&transcript)
    .args(["--index", "2", "--response-quality", "2", "--verbatim", "Link was broken"])
    .args(["--flag", "too-short", "--flag", "missing-info"])
    .args(["--server-url", &server.url()])
    .assert()
    .success()
    .stdout(predicate::str::contains("Feedback recorded"))
    .stderr(predicate::str::contains(r#""metric_name":"feedback_submit""#));

  mock.assert();
}

#[test]
fn test_submit_server_error_alerts_and_fails() {
  let temp = TempDir::new().unwrap();
  let transcript = write_transcript(&temp);
  let mut server = mockito::Server::new();

  let mock = server.mock("POST", "/feedback").with_status(500).expect(1).create();

  feedback_cmd()
    .args(["submit", "--transcript"])
    .arg(&transcript)
    .args(["--index", "2"])
    .env("FEEDBACK_SERVER_URL", server.url())
    .assert()
    .failure()
    .stderr(predicate::str::contains("[alert] Unknown error").count(1));

  mock.assert();
}
