use chrono::Utc;
use std::process::Command;

/// Trimmed stdout of a git command, if it ran and printed something
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads");

    let sha = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
    let build_id = format!("{}+g{sha}", Utc::now().format("%Y.%m.%d"));

    println!("cargo:rustc-env=RACETOOLS_BUILD_ID={build_id}");
}
