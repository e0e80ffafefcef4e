//
// launcher_binary_tests.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//

//! End-to-end tests that run the kklaunch binary against a fake `java`

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use kkshared::env_names;

/// Lays out an installation: `config/jar_args.json` and `jars/`.
fn create_install(dir: &Path, manifest: &str, jars: &[&str]) {
    std::fs::create_dir_all(dir.join("config")).unwrap();
    std::fs::create_dir_all(dir.join("jars")).unwrap();
    std::fs::write(dir.join("config").join("jar_args.json"), manifest).unwrap();
    for jar in jars {
        std::fs::write(dir.join("jars").join(jar), b"").unwrap();
    }
}

/// Writes an executable shell script standing in for `java`.
fn fake_java(dir: &Path, body: &str) -> String {
    let path = dir.join("fake-java");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path.to_string_lossy().into_owned()
}

fn run_launcher(install_dir: &Path, vars: &[(&str, &str)]) -> Output {
    run_launcher_logging(install_dir, vars, "error")
}

fn run_launcher_logging(install_dir: &Path, vars: &[(&str, &str)], log_level: &str) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_kklaunch"));
    command
        .arg("--install-dir")
        .arg(install_dir)
        .arg("--log-level")
        .arg(log_level)
        .arg("/tmp/conn.json");
    for name in env_names::ALL {
        command.env_remove(name);
    }
    for (name, value) in vars {
        command.env(name, value);
    }
    command.output().expect("Failed to run kklaunch")
}

#[test]
fn test_launcher_passes_resolved_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let install = std::path::absolute(dir.path()).unwrap();
    create_install(
        &install,
        r#"{"classPath": ["a.jar", "b.jar"], "mainJar": "main.jar", "debuggerPort": ""}"#,
        &["main.jar", "a.jar", "b.jar"],
    );
    let java = fake_java(&install, r#"for arg in "$@"; do echo "$arg"; done"#);

    let output = run_launcher(
        &install,
        &[
            (env_names::KERNEL_JAVA_EXECUTABLE, java.as_str()),
            (env_names::JAVA_OPTS, "-Xmx1g"),
            (env_names::KERNEL_EXTRA_JAVA_OPTS, "'-Dname=two words'"),
        ],
    );

    assert!(output.status.success(), "launcher failed: {:?}", output);
    let home = install.to_string_lossy();
    let args: Vec<String> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect();
    assert_eq!(
        args,
        vec![
            "-Xmx1g".to_string(),
            "-Dname=two words".to_string(),
            "-jar".to_string(),
            format!("{}/jars/main.jar", home),
            format!("-classpath={0}/jars/a.jar:{0}/jars/b.jar", home),
            "/tmp/conn.json".to_string(),
            format!("-home={}", home),
        ]
    );
}

#[test]
fn test_launcher_logs_debug_port() {
    let dir = tempfile::tempdir().unwrap();
    create_install(
        dir.path(),
        r#"{"classPath": ["main.jar"], "mainJar": "main.jar", "debuggerPort": "5005"}"#,
        &["main.jar"],
    );
    let java = fake_java(dir.path(), r#"for arg in "$@"; do echo "$arg"; done"#);

    let output = run_launcher_logging(
        dir.path(),
        &[(env_names::KERNEL_JAVA_EXECUTABLE, java.as_str())],
        "info",
    );
    assert!(output.status.success(), "launcher failed: {:?}", output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Kernel debugger port: 5005"));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).lines().last(),
        Some("-debugPort=5005")
    );
}

#[test]
fn test_launcher_propagates_kernel_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    create_install(
        dir.path(),
        r#"{"classPath": ["main.jar"], "mainJar": "main.jar"}"#,
        &["main.jar"],
    );
    let java = fake_java(dir.path(), "exit 7");

    let output = run_launcher(dir.path(), &[(env_names::KERNEL_JAVA_EXECUTABLE, java.as_str())]);
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn test_launcher_refuses_missing_main_jar() {
    let dir = tempfile::tempdir().unwrap();
    create_install(
        dir.path(),
        r#"{"classPath": ["a.jar"], "mainJar": "main.jar"}"#,
        &["a.jar"],
    );
    let marker = dir.path().join("spawned");
    let java = fake_java(dir.path(), &format!("touch '{}'", marker.display()));

    let output = run_launcher(dir.path(), &[(env_names::KERNEL_JAVA_EXECUTABLE, java.as_str())]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!marker.exists(), "kernel process should not have started");
}

#[test]
fn test_launcher_reports_missing_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_launcher(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("jar_args.json"));
}

#[test]
fn test_launcher_interrupt_exits_130() {
    let dir = tempfile::tempdir().unwrap();
    create_install(
        dir.path(),
        r#"{"classPath": ["main.jar"], "mainJar": "main.jar"}"#,
        &["main.jar"],
    );
    let started = dir.path().join("started");
    let java = fake_java(
        dir.path(),
        &format!(
            "touch '{}'\nexec sleep 5 >/dev/null 2>&1",
            started.display()
        ),
    );

    let mut command = Command::new(env!("CARGO_BIN_EXE_kklaunch"));
    command
        .arg("--install-dir")
        .arg(dir.path())
        .arg("--log-level")
        .arg("error")
        .arg("/tmp/conn.json")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for name in env_names::ALL {
        command.env_remove(name);
    }
    command.env(env_names::KERNEL_JAVA_EXECUTABLE, &java);
    let launcher = command.spawn().expect("Failed to start kklaunch");

    // Wait for the kernel to start, then give the launcher a moment to
    // begin waiting on it
    let deadline = Instant::now() + Duration::from_secs(10);
    while !started.exists() {
        assert!(Instant::now() < deadline, "kernel process never started");
        std::thread::sleep(Duration::from_millis(20));
    }
    std::thread::sleep(Duration::from_millis(300));

    let status = Command::new("kill")
        .arg("-INT")
        .arg(launcher.id().to_string())
        .status()
        .expect("Failed to run kill");
    assert!(status.success());

    let output = launcher.wait_with_output().expect("Failed to wait for kklaunch");
    assert_eq!(output.status.code(), Some(130));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Kernel interrupted\n");
}
