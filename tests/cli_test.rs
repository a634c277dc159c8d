//! End-to-end tests of the fsadmin binary
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Child, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use assert_cmd::Command;
use predicates::prelude::*;
use rstest::rstest;
use tempfile::TempDir;

/// fsadmin with an empty config home and a deterministic runtime target.
fn fsadmin(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fsadmin").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("FSADMIN_HOME")
        .env_remove("FSADMIN_RUNTIME__JAVA")
        .env("FSADMIN_RUNTIME__CLASSPATH", "/opt/fs/lib/*")
        .env("FSADMIN_RUNTIME__SHELL_CLASS", "fs.Shell");
    cmd
}

#[test]
fn given_no_operation_when_running_fs_then_operations_listed() {
    let home = TempDir::new().unwrap();

    fsadmin(&home)
        .arg("fs")
        .assert()
        .success()
        .stdout(predicate::str::contains("chgrp <group> <path>"))
        .stdout(predicate::str::contains("touch <path>"));
}

#[test]
fn given_operation_help_when_running_then_flags_shown_without_launch() {
    let home = TempDir::new().unwrap();

    fsadmin(&home)
        .env("FSADMIN_RUNTIME__JAVA", "/nonexistent/java")
        .args(["fs", "chgrp", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--recursive"))
        .stdout(predicate::str::contains("--attach-debug"));
}

#[test]
fn given_too_few_arguments_when_running_then_usage_exit_code() {
    let home = TempDir::new().unwrap();

    fsadmin(&home)
        .env("FSADMIN_RUNTIME__JAVA", "/nonexistent/java")
        .args(["fs", "chgrp", "developers"])
        .assert()
        .code(64)
        .stderr(predicate::str::contains("chgrp <group> <path>"));
}

#[test]
fn given_unknown_operation_when_running_then_usage_exit_code() {
    let home = TempDir::new().unwrap();

    fsadmin(&home)
        .args(["fs", "frobnicate", "/data"])
        .assert()
        .code(64)
        .stderr(predicate::str::contains("frobnicate"));
}

#[test]
fn given_missing_runtime_when_running_then_not_found_exit_code() {
    let home = TempDir::new().unwrap();

    fsadmin(&home)
        .env("FSADMIN_RUNTIME__JAVA", "/nonexistent/java")
        .args(["fs", "ls", "/"])
        .assert()
        .code(127)
        .stderr(predicate::str::contains("/nonexistent/java"));
}

#[test]
fn given_runtime_echo_when_running_then_command_line_composed_in_order() {
    let home = TempDir::new().unwrap();

    fsadmin(&home)
        .env("FSADMIN_RUNTIME__JAVA", "echo")
        .args(["fs", "chgrp", "developers", "/data", "-R"])
        .assert()
        .success()
        .stdout("-cp /opt/fs/lib/* fs.Shell chgrp -R developers /data\n");
}

#[test]
fn given_failing_runtime_when_running_then_status_propagated_silently() {
    let home = TempDir::new().unwrap();

    fsadmin(&home)
        .env("FSADMIN_RUNTIME__JAVA", "false")
        .args(["fs", "rm", "/data"])
        .assert()
        .code(1)
        .stderr(predicate::str::is_empty());
}

#[test]
fn given_config_show_when_running_then_effective_settings_printed() {
    let home = TempDir::new().unwrap();

    fsadmin(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[runtime]"))
        .stdout(predicate::str::contains("shell_class = \"fs.Shell\""));
}

#[test]
fn given_config_init_twice_when_running_then_second_requires_force() {
    let home = TempDir::new().unwrap();

    fsadmin(&home).args(["config", "init"]).assert().success();
    assert!(home.path().join("fsadmin").join("fsadmin.toml").exists());

    fsadmin(&home).args(["config", "init"]).assert().code(64);
    fsadmin(&home)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn given_unknown_flag_when_running_then_single_error_prefix() {
    let home = TempDir::new().unwrap();

    fsadmin(&home)
        .env("NO_COLOR", "1")
        .args(["fs", "ls", "-c", "/x"])
        .assert()
        .code(64)
        .stderr(predicate::str::contains("unexpected argument '-c'"))
        .stderr(predicate::str::contains("error").count(1));
}

// ============================================================
// Signal forwarding to the running runtime
// ============================================================

/// Runtime that records which signal it got and exits with a matching code.
fn trapping_runtime(dir: &Path) -> PathBuf {
    let script = dir.join("runtime.sh");
    fs::write(
        &script,
        r#"#!/bin/sh
trap 'echo got-int > "$MARKER"; exit 5' INT
trap 'echo got-term > "$MARKER"; exit 6' TERM
touch "$MARKER.started"
while :; do sleep 0.1; done
"#,
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}

fn wait_for_file(path: &Path, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if path.exists() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    false
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Option<ExitStatus> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Some(status) = child.try_wait().unwrap() {
            return Some(status);
        }
        thread::sleep(Duration::from_millis(20));
    }
    let _ = child.kill();
    None
}

#[rstest]
#[case::interrupt(libc::SIGINT, "got-int", 5)]
#[case::terminate(libc::SIGTERM, "got-term", 6)]
fn given_signal_to_cli_when_runtime_running_then_runtime_gets_same_signal(
    #[case] signal: libc::c_int,
    #[case] expected_marker: &str,
    #[case] expected_code: i32,
) {
    // Arrange: a plain-executable runtime that traps signals
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let marker = work.path().join("marker");
    let mut cli = std::process::Command::new(assert_cmd::cargo::cargo_bin("fsadmin"))
        .env("XDG_CONFIG_HOME", home.path())
        .env("FSADMIN_RUNTIME__JAVA", trapping_runtime(work.path()))
        .env("FSADMIN_RUNTIME__SHELL_CLASS", "")
        .env("MARKER", &marker)
        .args(["fs", "ls", "/"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .spawn()
        .unwrap();
    assert!(
        wait_for_file(&work.path().join("marker.started"), Duration::from_secs(10)),
        "runtime never started"
    );
    // let the launcher register the child
    thread::sleep(Duration::from_millis(300));

    // Act: signal the CLI process only
    let rc = unsafe { libc::kill(cli.id() as libc::pid_t, signal) };
    assert_eq!(rc, 0);
    let status = wait_with_timeout(&mut cli, Duration::from_secs(10)).expect("fsadmin hung");

    // Assert
    assert_eq!(fs::read_to_string(&marker).unwrap().trim(), expected_marker);
    assert_eq!(status.code(), Some(expected_code));
}
