use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("eventdesk")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("quizzes"))
        .stdout(predicate::str::contains("events"))
        .stdout(predicate::str::contains("policies"))
        .stdout(predicate::str::contains("--api-url"));
}

#[test]
fn test_quizzes_help_shows_paging_flags() {
    cargo_bin_cmd!("eventdesk")
        .args(["quizzes", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--page"))
        .stdout(predicate::str::contains("--size"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("eventdesk")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}

#[test]
fn test_console_requires_terminal() {
    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("eventdesk")
        .env("EVENTDESK_HOME", dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires a terminal"));
}
