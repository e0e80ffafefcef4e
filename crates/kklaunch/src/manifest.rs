//
// manifest.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

//! The launch manifest (`config/jar_args.json`) of a kernel installation.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::LaunchError;

/// The `debuggerPort` value that asks for a generated port.
const GENERATE_PORT: &str = "generate";

/// How the kernel's debug agent is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugSpec {
    /// No debug agent
    None,

    /// Listen for a debugger on a fixed port
    FixedPort(u16),

    /// Pick a free port when the kernel starts
    Auto,

    /// A complete, pre-formatted agent argument (`debuggerConfig`)
    Agent(String),
}

/// The contents of the manifest as written on disk.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ManifestFile {
    class_path: Vec<String>,
    main_jar: String,
    #[serde(default)]
    debugger_config: Option<String>,
    #[serde(default)]
    debugger_port: Option<Value>,
}

/// Classpath, entry point and debug configuration for one launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchManifest {
    /// Jar file names, relative to the jars directory
    pub class_path: Vec<String>,

    /// File name of the jar containing the kernel's entry point
    pub main_jar: String,

    pub debug: DebugSpec,
}

impl LaunchManifest {
    /// Read and validate a manifest file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LaunchError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LaunchError::ManifestNotFound(path.to_path_buf()),
            _ => LaunchError::ManifestUnreadable(path.to_path_buf(), e),
        })?;

        let manifest = Self::parse(&contents)
            .map_err(|reason| LaunchError::ManifestMalformed(path.to_path_buf(), reason))?;

        log::debug!(
            "Loaded launch manifest {}: main jar {}, {} classpath entries, debug {:?}",
            path.display(),
            manifest.main_jar,
            manifest.class_path.len(),
            manifest.debug
        );
        Ok(manifest)
    }

    /// Parse manifest JSON; the error is a human-readable reason.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let file: ManifestFile = serde_json::from_str(contents).map_err(|e| e.to_string())?;

        if file.class_path.is_empty() {
            return Err(String::from("classPath is empty"));
        }
        if file.main_jar.is_empty() {
            return Err(String::from("mainJar is empty"));
        }

        let debug = match file.debugger_port {
            Some(port) => parse_debugger_port(&port)?,
            None => match file.debugger_config {
                Some(config) if !config.is_empty() => DebugSpec::Agent(config),
                _ => DebugSpec::None,
            },
        };

        Ok(Self {
            class_path: file.class_path,
            main_jar: file.main_jar,
            debug,
        })
    }
}

fn parse_debugger_port(value: &Value) -> Result<DebugSpec, String> {
    let port = match value {
        Value::Null => return Ok(DebugSpec::None),
        Value::String(s) if s.is_empty() => return Ok(DebugSpec::None),
        Value::String(s) if s == GENERATE_PORT => return Ok(DebugSpec::Auto),
        Value::String(s) => s.trim().parse::<u16>().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        _ => None,
    };

    match port {
        Some(port) if port != 0 => Ok(DebugSpec::FixedPort(port)),
        _ => Err(format!(
            "debuggerPort must be empty, \"{}\", or a port between 1 and 65535 (got {})",
            GENERATE_PORT, value
        )),
    }
}
