//! Common test utilities and fixtures
//!
//! Commands built here run in a scratch directory with HOME pointed at it, so
//! no real config file, `.env` or API key on the machine leaks into a test.

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

const SCRUBBED_VARS: [&str; 15] = [
    "EXPERT_CHAT_CONFIG",
    "EXPERT_CHAT_ENV_FILE",
    "EXPERT_CHAT_PERSONA",
    "EXPERT_CHAT_PROVIDER",
    "EXPERT_CHAT_BASE_URL",
    "EXPERT_CHAT_MODEL",
    "EXPERT_CHAT_TIMEOUT_SECS",
    "EXPERT_CHAT_HOST",
    "EXPERT_CHAT_PORT",
    "EXPERT_CHAT_LOG_LEVEL",
    "EXPERT_CHAT_LOG_FILE",
    "EXPERT_CHAT_LOG_JSON",
    "OPENAI_API_KEY",
    "OPENAI_API_BASE",
    "RUST_LOG",
];

/// Get the path to the test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get a path to a specific fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Get the valid config fixture path
pub fn valid_config_fixture() -> PathBuf {
    fixture_path("valid_config.toml")
}

/// Get the invalid config fixture path
pub fn invalid_config_fixture() -> PathBuf {
    fixture_path("invalid_config.toml")
}

/// `expert-chat` running inside `sandbox` with a clean environment
pub fn chat_cmd(sandbox: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("expert-chat").unwrap();
    cmd.current_dir(sandbox.path())
        .env("HOME", sandbox.path())
        .env("XDG_CONFIG_HOME", sandbox.path().join(".config"));
    for var in SCRUBBED_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Same as `chat_cmd`, answering through the offline mock provider
pub fn mock_cmd(sandbox: &TempDir) -> Command {
    let mut cmd = chat_cmd(sandbox);
    cmd.env("EXPERT_CHAT_PROVIDER", "mock");
    cmd
}
