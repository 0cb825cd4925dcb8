//! CLI integration tests
//!
//! Tests the command-line interface using assert_cmd

mod common;

use predicates::prelude::*;
use tempfile::TempDir;

use common::{chat_cmd, mock_cmd};

// ─────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    let sandbox = TempDir::new().unwrap();
    chat_cmd(&sandbox)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("persona"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("--env-file"));
}

#[test]
fn test_version_command() {
    let sandbox = TempDir::new().unwrap();
    chat_cmd(&sandbox)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("expert-chat"))
        .stdout(predicate::str::contains("Build Information"))
        .stdout(predicate::str::contains("Git Hash"))
        .stdout(predicate::str::contains("Target"));
}

#[test]
fn test_short_version_flag() {
    let sandbox = TempDir::new().unwrap();
    chat_cmd(&sandbox)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("expert-chat"));
}

// ─────────────────────────────────────────────────────────────────
// Persona Command Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_persona_list() {
    let sandbox = TempDir::new().unwrap();
    chat_cmd(&sandbox)
        .args(["persona", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("doctor"))
        .stdout(predicate::str::contains("医師"))
        .stdout(predicate::str::contains("lawyer"))
        .stdout(predicate::str::contains("弁護士"))
        .stdout(predicate::str::contains("engineer"))
        .stdout(predicate::str::contains("エンジニア"));
}

#[test]
fn test_persona_show() {
    let sandbox = TempDir::new().unwrap();
    chat_cmd(&sandbox)
        .args(["persona", "show", "engineer"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "あなたは熟練のソフトウェアエンジニアです。技術的な質問に的確に答えてください。",
        ));
}

#[test]
fn test_persona_show_unknown() {
    let sandbox = TempDir::new().unwrap();
    chat_cmd(&sandbox)
        .args(["persona", "show", "chef"])
        .assert()
        .code(50)
        .stderr(predicate::str::contains("E500"))
        .stderr(predicate::str::contains("未定義の専門家タイプです: chef"));
}

// ─────────────────────────────────────────────────────────────────
// Ask Command Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_ask_with_mock_provider() {
    let sandbox = TempDir::new().unwrap();
    mock_cmd(&sandbox)
        .args(["ask", "頭が痛い", "--persona", "doctor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(mock) ご相談内容「頭が痛い」を受け付けました。"));
}

#[test]
fn test_ask_reads_stdin() {
    let sandbox = TempDir::new().unwrap();
    mock_cmd(&sandbox)
        .args(["ask", "--persona", "lawyer"])
        .write_stdin("契約の解除について\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("「契約の解除について」"));
}

#[test]
fn test_ask_blank_input_warns() {
    let sandbox = TempDir::new().unwrap();
    mock_cmd(&sandbox)
        .args(["ask", "   "])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("相談内容を入力してください。"));
}

#[test]
fn test_ask_unknown_persona() {
    let sandbox = TempDir::new().unwrap();
    mock_cmd(&sandbox)
        .args(["ask", "hello", "--persona", "chef"])
        .assert()
        .code(50)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("persona list"));
}

#[test]
fn test_ask_unreachable_endpoint_prints_error_text() {
    let sandbox = TempDir::new().unwrap();
    chat_cmd(&sandbox)
        .env("EXPERT_CHAT_BASE_URL", "http://127.0.0.1:1/v1")
        .env("EXPERT_CHAT_TIMEOUT_SECS", "5")
        .args(["ask", "hello", "--persona", "engineer"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("エラーが発生しました: "));
}

// ─────────────────────────────────────────────────────────────────
// Env File Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_default_env_file_is_loaded() {
    let sandbox = TempDir::new().unwrap();
    std::fs::write(
        sandbox.path().join(".env"),
        "OPENAI_API_KEY=sk-from-dotenv\nEXPERT_CHAT_PROVIDER=mock\n",
    )
    .unwrap();

    chat_cmd(&sandbox)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("provider = \"mock\""))
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("sk-from-dotenv").not());
}

#[test]
fn test_explicit_env_file_missing() {
    let sandbox = TempDir::new().unwrap();
    chat_cmd(&sandbox)
        .args(["--env-file", "missing.env", "persona", "list"])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("E103"));
}
