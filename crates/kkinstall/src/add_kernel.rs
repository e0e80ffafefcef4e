//
// add_kernel.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

//! Registering an additional kernel with its own JDK, JVM arguments and
//! environment.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use kkshared::env_names;

use crate::registration::{install_kernel, update_kernel_spec};

#[cfg(target_os = "windows")]
const JAVA_BINARY: &str = "java.exe";
#[cfg(not(target_os = "windows"))]
const JAVA_BINARY: &str = "java";

/// What to register.
#[derive(Debug, Clone, Default)]
pub struct AddKernelOptions {
    /// The kernel's sub-name; derived from the JDK when absent
    pub name: Option<String>,

    /// Home directory of the JDK to use (already absolute)
    pub jdk: Option<PathBuf>,

    pub jvm_args: Vec<String>,

    pub env: Vec<(String, String)>,

    /// Replace the JVM options instead of adding to them
    pub set_jvm_args: bool,

    pub force: bool,
}

/// The result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedKernel {
    pub kernel_name: String,
    pub display_name: String,
    pub kernel_dir: PathBuf,
}

/// Directory name for a kernel sub-name: `kotlin_<name>` with spaces
/// replaced by underscores.
pub fn kernel_dir_name(name: &str) -> String {
    format!("kotlin_{}", name.replace(' ', "_"))
}

/// Display name for a kernel sub-name.
pub fn display_name(name: &str) -> String {
    format!("Kotlin ({})", name)
}

/// The `java` binary inside a JDK home.
pub fn jdk_java(jdk: &Path) -> PathBuf {
    jdk.join("bin").join(JAVA_BINARY)
}

/// Compute the env block for the new kernel.
///
/// Variables the kernel configures itself are dropped from `env` with a
/// warning. JVM arguments are shell-quoted so the launcher splits them back
/// into exactly the same words.
pub fn kernel_env(
    options: &AddKernelOptions,
) -> Result<BTreeMap<String, String>, anyhow::Error> {
    let mut env = BTreeMap::new();
    for (name, value) in &options.env {
        if env_names::RESERVED_FOR_REGISTRATION.contains(&name.as_str()) {
            log::warn!(
                "Specified environment variable {}, will be ignored. Use the corresponding arguments instead.",
                name
            );
            continue;
        }
        env.insert(name.clone(), value.clone());
    }

    let jvm_args = shlex::try_join(options.jvm_args.iter().map(String::as_str))
        .map_err(|e| anyhow::anyhow!("Failed to quote JVM arguments: {}", e))?;
    let jvm_var = if options.set_jvm_args {
        env_names::KERNEL_JAVA_OPTS
    } else {
        env_names::KERNEL_INTERNAL_ADDED_JAVA_OPTS
    };
    env.insert(jvm_var.to_string(), jvm_args);

    if let Some(jdk) = &options.jdk {
        env.insert(
            env_names::KERNEL_JAVA_HOME.to_string(),
            jdk.to_string_lossy().into_owned(),
        );
    }

    Ok(env)
}

/// Derive a kernel name (`JDK <dist> <version>`) from the first line of
/// `java --version`, e.g. `openjdk 17.0.2 2022-01-18`.
pub fn name_from_version_output(output: &str) -> Option<String> {
    let mut words = output.lines().next()?.split(' ');
    let dist = words.next().filter(|w| !w.is_empty())?;
    let version = words.next().filter(|w| !w.is_empty())?;
    Some(format!("JDK {} {}", dist, version))
}

fn detect_jdk_name(java: &Path) -> Result<String, anyhow::Error> {
    let output = Command::new(java).arg("--version").output()?;
    if !output.status.success() {
        return Err(anyhow::anyhow!(
            "{} --version failed with {}",
            java.display(),
            output.status
        ));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    name_from_version_output(&stdout).ok_or_else(|| {
        anyhow::anyhow!(
            "Couldn't determine the JDK version from '{}'",
            stdout.trim()
        )
    })
}

/// Install a copy of the base kernel from `template` under `kernels_dir`,
/// configured with the given JDK, JVM arguments and environment.
pub fn add_kernel(
    options: &AddKernelOptions,
    template: &Path,
    kernels_dir: &Path,
) -> Result<AddedKernel, anyhow::Error> {
    let mut name = options.name.clone();

    if let Some(jdk) = &options.jdk {
        let java = jdk_java(jdk);
        if !java.exists() {
            return Err(anyhow::anyhow!(
                "JDK {} has no bin/{}",
                jdk.display(),
                JAVA_BINARY
            ));
        }
        if name.is_none() {
            let detected = detect_jdk_name(&java)?;
            log::info!("Detected kernel name '{}' from {}", detected, java.display());
            name = Some(detected);
        }
    }

    let name = name.ok_or_else(|| anyhow::anyhow!("name is required when JDK not specified."))?;
    let env = kernel_env(options)?;

    let kernel_name = kernel_dir_name(&name);
    let display_name = display_name(&name);
    let kernel_dir = install_kernel(template, kernels_dir, &kernel_name, options.force)?;
    update_kernel_spec(&kernel_dir, &display_name, env)?;

    Ok(AddedKernel {
        kernel_name,
        display_name,
        kernel_dir,
    })
}
