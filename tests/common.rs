#![allow(dead_code)]
use assert_cmd::{cargo_bin_cmd, Command};
use tempfile::TempDir;

/// A `triad` command whose data directory is `dir`
pub fn triad(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("triad");
    cmd.env("TRIAD_DATA_DIR", dir.path())
        .env_remove("TRIAD_LOG")
        .env_remove("TRIAD_ACCESS_TOKEN")
        .env_remove("TRIAD_API_KEY");
    cmd
}

/// Fresh data directory with `triad init` already run
pub fn initialized() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    triad(&dir).arg("init").assert().success();
    dir
}

/// Expense ids ("exp-xxxxxxxx") printed in a command's stdout
pub fn expense_ids(stdout: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stdout)
        .split(|c: char| c.is_whitespace() || c == '│' || c == '|')
        .filter(|w| w.starts_with("exp-") && w.len() == 12)
        .map(str::to_string)
        .collect()
}
