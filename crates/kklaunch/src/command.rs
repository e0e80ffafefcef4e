//
// command.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

//! Assembly of the JVM command line that starts the kernel.

use std::path::{Path, PathBuf};

use kkshared::port_picker::{find_free_port, PortProbe, DEFAULT_DEBUG_PORT, LAST_DEBUG_PORT};

use crate::environment::ResolvedEnvironment;
use crate::error::LaunchError;
use crate::manifest::{DebugSpec, LaunchManifest};

/// Separator between classpath entries.
#[cfg(target_os = "windows")]
pub const CLASSPATH_SEPARATOR: &str = ";";
#[cfg(not(target_os = "windows"))]
pub const CLASSPATH_SEPARATOR: &str = ":";

/// Where the kernel's files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelPaths {
    /// Directory holding the main jar and the classpath jars
    pub jars_dir: PathBuf,

    /// The installation directory, passed to the kernel as `-home=`
    pub home_dir: PathBuf,
}

impl KernelPaths {
    /// Layout of an executables directory: jars in `<dir>/jars`, home at
    /// `<dir>`. Relative paths are made absolute against the current
    /// directory.
    pub fn from_executables_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let home_dir = match std::path::absolute(dir) {
            Ok(path) => path,
            Err(e) => {
                log::warn!("Failed to make {} absolute: {}", dir.display(), e);
                dir.to_path_buf()
            }
        };
        Self {
            jars_dir: home_dir.join("jars"),
            home_dir,
        }
    }
}

/// A fully resolved kernel command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub executable: String,
    pub argv: Vec<String>,

    /// The debug port the kernel will listen on, if one was resolved
    pub debug_port: Option<u16>,
}

/// The JDWP agent argument for a debug port.
pub fn debug_agent_arg(port: u16) -> String {
    format!(
        "-agentlib:jdwp=transport=dt_socket,server=y,suspend=n,address={}",
        port
    )
}

/// Build the command line for the kernel.
///
/// The argument order is fixed because the kernel parses some of it
/// positionally:
///
/// ```text
/// <java> <jvm options...> -jar [<debug agent>] <main jar>
///     -classpath=<jars> <connection file> -home=<home> [-debugPort=<port>]
/// ```
///
/// `probe` is only consulted when the manifest asks for a generated debug
/// port.
pub fn build<P: PortProbe + ?Sized>(
    manifest: &LaunchManifest,
    env: &ResolvedEnvironment,
    connection_file: &str,
    paths: &KernelPaths,
    probe: &P,
) -> Result<LaunchCommand, LaunchError> {
    let main_jar = paths.jars_dir.join(&manifest.main_jar);
    if !main_jar.is_file() {
        return Err(LaunchError::MainJarNotFound(main_jar));
    }

    let (debug_agent, debug_port) = match &manifest.debug {
        DebugSpec::None => (None, None),
        DebugSpec::FixedPort(port) => (Some(debug_agent_arg(*port)), Some(*port)),
        DebugSpec::Auto => {
            let port = find_free_port(DEFAULT_DEBUG_PORT, probe).ok_or(
                LaunchError::NoPortAvailable {
                    first: DEFAULT_DEBUG_PORT,
                    last: LAST_DEBUG_PORT,
                },
            )?;
            log::info!("Kernel debugger will listen on port {}", port);
            (Some(debug_agent_arg(port)), Some(port))
        }
        DebugSpec::Agent(agent) => (Some(agent.clone()), None),
    };

    let class_path = manifest
        .class_path
        .iter()
        .map(|jar| paths.jars_dir.join(jar).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(CLASSPATH_SEPARATOR);

    for jar in &manifest.class_path {
        let path = paths.jars_dir.join(jar);
        if !path.exists() {
            log::warn!("Classpath entry {} does not exist", path.display());
        }
    }

    let mut argv = env.jvm_options.clone();
    argv.push(String::from("-jar"));
    argv.extend(debug_agent);
    argv.push(main_jar.to_string_lossy().into_owned());
    argv.push(format!("-classpath={}", class_path));
    argv.push(connection_file.to_string());
    argv.push(format!("-home={}", paths.home_dir.to_string_lossy()));
    if let Some(port) = debug_port {
        argv.push(format!("-debugPort={}", port));
    }

    Ok(LaunchCommand {
        executable: env.java_command(),
        argv,
        debug_port,
    })
}
