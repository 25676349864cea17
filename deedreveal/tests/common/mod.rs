//! Shared integration-test harness for running the `deedreveal` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Environment variables that would leak the developer's setup into tests.
const ISOLATED_ENV: &[&str] = &[
    "DEEDREVEAL_CONFIG",
    "DEEDREVEAL_GATEWAY",
    "DEEDREVEAL_FETCH_TIMEOUT",
    "DEEDREVEAL_MAX_METADATA_BYTES",
    "DEEDREVEAL_TOKEN_DECIMALS",
    "DEEDREVEAL_BIND",
    "DEEDREVEAL_LOG_LEVEL",
    "DEEDREVEAL_LOG_FORMAT",
    "DEEDREVEAL_COLOR",
];

/// Path to the compiled binary.
#[must_use]
pub fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_deedreveal")
}

/// Builds a command for the binary with a clean `DEEDREVEAL_*` environment.
#[must_use]
pub fn command(args: &[&str]) -> Command {
    let mut cmd = Command::new(bin());
    for var in ISOLATED_ENV {
        cmd.env_remove(var);
    }
    cmd.args(args).env("NO_COLOR", "1");
    cmd
}

/// Runs the binary to completion and captures its output.
#[allow(clippy::missing_panics_doc)]
#[must_use]
pub fn run(args: &[&str]) -> Output {
    command(args).output().expect("failed to run deedreveal")
}

/// Stdout of a finished command as a string.
#[must_use]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of a finished command as a string.
#[must_use]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Returns the path to a test fixture.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Fixture path as a `&str`-friendly `String`.
#[must_use]
pub fn fixture(name: &str) -> String {
    fixture_path(name).to_string_lossy().into_owned()
}
