//! End-to-end tests for the `codeinventory completions` command.

mod common;
use common::prelude::*;

#[test]
fn test_completions_help() {
    let mut cmd = cargo_bin_cmd!("codeinventory");
    cmd.args(["completions", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generate shell completion scripts"))
        .stdout(predicate::str::contains("bash"))
        .stdout(predicate::str::contains("powershell"))
        .stdout(predicate::str::contains("elvish"));
}

#[test]
fn test_completions_bash() {
    let mut cmd = cargo_bin_cmd!("codeinventory");
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_codeinventory()"))
        .stdout(predicate::str::contains("github"))
        .stdout(predicate::str::contains("project"));
}

#[test]
fn test_completions_zsh() {
    let mut cmd = cargo_bin_cmd!("codeinventory");
    cmd.args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef codeinventory"));
}

#[test]
fn test_completions_fish() {
    let mut cmd = cargo_bin_cmd!("codeinventory");
    cmd.args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete -c codeinventory"));
}

#[test]
fn test_completions_unknown_shell() {
    let mut cmd = cargo_bin_cmd!("codeinventory");
    cmd.args(["completions", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'tcsh'"));
}
