//
// process.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

//! Runs the kernel process to completion.

use std::future::Future;
use std::process::{ExitStatus, Stdio};

use crate::command::LaunchCommand;
use crate::error::LaunchError;

/// Exit code reported when the launcher is interrupted.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// How a launch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// The kernel exited on its own with this code
    Exited(i32),

    /// The launcher was interrupted while waiting for the kernel
    Interrupted,
}

/// Start the kernel and wait for it to exit, or for Ctrl-C.
pub async fn launch(command: LaunchCommand) -> Result<ExitOutcome, LaunchError> {
    launch_until(command, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for interrupts: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Start the kernel and wait for it to exit, or for `interrupt` to resolve.
///
/// The kernel's standard streams are inherited so its output reaches the
/// front-end unchanged. An interrupt does not signal the kernel; it is left
/// to handle its own termination when the launcher goes away.
pub async fn launch_until<F>(
    command: LaunchCommand,
    interrupt: F,
) -> Result<ExitOutcome, LaunchError>
where
    F: Future<Output = ()>,
{
    log::info!(
        "Starting kernel: {} {}",
        command.executable,
        command.argv.join(" ")
    );

    let mut child = tokio::process::Command::new(&command.executable)
        .args(&command.argv)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| LaunchError::ChildProcessError(command.executable.clone(), e))?;

    log::debug!("Kernel process started with pid {:?}", child.id());

    tokio::select! {
        status = child.wait() => {
            let status =
                status.map_err(|e| LaunchError::ChildProcessError(command.executable.clone(), e))?;
            let code = exit_code(status);
            log::info!("Kernel process exited with status: {}", status);
            Ok(ExitOutcome::Exited(code))
        }
        _ = interrupt => {
            log::debug!("Interrupted while waiting for kernel process");
            Ok(ExitOutcome::Interrupted)
        }
    }
}

/// The exit code to propagate for a child's exit status. A child killed by a
/// signal reports `128 + signal`, as a shell would.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            log::error!("Kernel process was terminated by signal {}", signal);
            return 128 + signal;
        }
    }

    log::error!("Kernel process exited abnormally: {}", status);
    1
}
