use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn missing_token_is_a_fatal_configuration_error() {
    let mut cmd = Command::cargo_bin("docon").unwrap();
    cmd.env_remove("DO_API_TOKEN")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "DigitalOcean API token not provided",
        ));
}

#[test]
fn empty_token_env_var_is_rejected() {
    let mut cmd = Command::cargo_bin("docon").unwrap();
    cmd.env("DO_API_TOKEN", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "DigitalOcean API token not provided",
        ));
}

#[test]
fn help_lists_startup_flags() {
    let mut cmd = Command::cargo_bin("docon").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--token"))
        .stdout(predicate::str::contains("--playbooks"))
        .stdout(predicate::str::contains("--init"));
}
