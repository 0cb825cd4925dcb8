//! Build script for expert-chat
//!
//! Embeds git, toolchain and target information so `expert-chat version`
//! can report exactly which build is running.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let git_hash = command_output("git", &["rev-parse", "--short=8", "HEAD"]);
    let git_branch = command_output("git", &["rev-parse", "--abbrev-ref", "HEAD"]);
    let git_dirty = match Command::new("git").args(["status", "--porcelain"]).output() {
        Ok(out) if out.status.success() => (!out.stdout.is_empty()).to_string(),
        _ => "unknown".to_string(),
    };

    let vars = [
        ("EXPERT_CHAT_GIT_HASH", git_hash),
        ("EXPERT_CHAT_GIT_BRANCH", git_branch),
        ("EXPERT_CHAT_GIT_DIRTY", git_dirty),
        (
            "EXPERT_CHAT_BUILD_TIMESTAMP",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ),
        ("EXPERT_CHAT_TARGET", env_or_unknown("TARGET")),
        ("EXPERT_CHAT_PROFILE", env_or_unknown("PROFILE")),
        ("EXPERT_CHAT_HOST", env_or_unknown("HOST")),
        ("EXPERT_CHAT_RUSTC_VERSION", command_output("rustc", &["--version"])),
    ];

    for (key, value) in &vars {
        println!("cargo:rustc-env={}={}", key, value);
    }
}

/// Trimmed stdout of a successful command, or "unknown"
fn command_output(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn env_or_unknown(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| "unknown".to_string())
}
