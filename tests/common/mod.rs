//! Common helpers for suite and CLI tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Writes `contents` to `dir/name` and returns the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create directory");
    }
    std::fs::write(&path, contents).expect("Failed to write file");
    path
}

/// Runs the `polyrt` binary with `args`.
#[allow(dead_code)]
pub fn polyrt(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_polyrt"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute polyrt")
}
