//! Build script for qradio-server
//!
//! Stamps the binary with `GIT_HASH`, `BUILD_TIMESTAMP` and `BUILD_PROFILE`,
//! logged at startup. No `rerun-if-changed` is emitted, so the stamp is
//! refreshed on every build.

use chrono::{SecondsFormat, Utc};
use std::env;
use std::process::Command;

const UNKNOWN: &str = "unknown";

fn main() {
    let git_hash = short_commit().unwrap_or_else(|| UNKNOWN.to_string());
    let built_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let profile = env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_string());

    for (key, value) in [
        ("GIT_HASH", git_hash.as_str()),
        ("BUILD_TIMESTAMP", built_at.as_str()),
        ("BUILD_PROFILE", profile.as_str()),
    ] {
        println!("cargo:rustc-env={}={}", key, value);
    }
}

/// Eight-character commit hash, `None` outside a git checkout
fn short_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let hash = String::from_utf8(output.stdout).ok()?;
    let hash = hash.trim();
    (!hash.is_empty()).then(|| hash.to_string())
}
