// tests/common/mod.rs
// Shared test utilities for integration tests
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Path to the built logsift binary
pub fn binary_path() -> PathBuf {
    let profile_dir = if cfg!(debug_assertions) {
        "target/debug"
    } else {
        "target/release"
    };
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join(profile_dir)
        .join("logsift")
}

/// Run logsift with the given working directory and arguments
pub fn run_logsift_in(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output: Output = Command::new(binary_path())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to start logsift");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Write a fixture log file under `dir` and return its path
pub fn write_log(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut content = lines.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    std::fs::write(&path, content).expect("Failed to write fixture log");
    path
}

/// Read the output file into its lines
pub fn read_output_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("Failed to read output file")
        .lines()
        .map(|l| l.to_string())
        .collect()
}
