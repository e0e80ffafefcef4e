//
// process_tests.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//

//! Tests for running the kernel process

use kklaunch::command::LaunchCommand;
use kklaunch::error::LaunchError;
use kklaunch::process::{launch_until, ExitOutcome};

fn command(executable: &str, argv: &[&str]) -> LaunchCommand {
    LaunchCommand {
        executable: executable.to_string(),
        argv: argv.iter().map(|arg| arg.to_string()).collect(),
        debug_port: None,
    }
}

#[tokio::test]
async fn test_missing_executable_is_child_process_error() {
    let result = launch_until(
        command("/definitely/not/a/java", &["-jar", "main.jar"]),
        std::future::pending(),
    )
    .await;
    match result {
        Err(LaunchError::ChildProcessError(executable, _)) => {
            assert_eq!(executable, "/definitely/not/a/java")
        }
        other => panic!("Expected ChildProcessError, got {:?}", other),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_exit_code_is_propagated() {
    let outcome = launch_until(command("sh", &["-c", "exit 3"]), std::future::pending())
        .await
        .unwrap();
    assert_eq!(outcome, ExitOutcome::Exited(3));

    let outcome = launch_until(command("sh", &["-c", "exit 0"]), std::future::pending())
        .await
        .unwrap();
    assert_eq!(outcome, ExitOutcome::Exited(0));
}

#[cfg(unix)]
#[tokio::test]
async fn test_signal_exit_maps_to_shell_convention() {
    let outcome = launch_until(command("sh", &["-c", "kill -9 $$"]), std::future::pending())
        .await
        .unwrap();
    assert_eq!(outcome, ExitOutcome::Exited(128 + 9));
}

#[cfg(unix)]
#[tokio::test]
async fn test_interrupt_while_waiting() {
    let outcome = launch_until(command("sleep", &["5"]), async {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    })
    .await
    .unwrap();
    assert_eq!(outcome, ExitOutcome::Interrupted);
}
