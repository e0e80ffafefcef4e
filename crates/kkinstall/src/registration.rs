//
// registration.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

//! Materializing kernel directories and editing their `kernel.json`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use kkshared::kernel_spec::{KernelSpec, KERNEL_SPEC_FILE};

/// Placeholder in a template's `kernel.json` argv replaced by the installed
/// kernel directory.
pub const KERNEL_DIR_PLACEHOLDER: &str = "{kernel_dir}";

/// Name of the base kernel installed by `install`.
pub const BASE_KERNEL_NAME: &str = "kotlin";

/// Display name of the base kernel.
pub const BASE_DISPLAY_NAME: &str = "Kotlin";

/// Copy a kernel template into `<kernels_dir>/<name>`.
///
/// The template must contain a `kernel.json`. An existing kernel with the
/// same name is replaced only when `force` is set. Returns the new kernel
/// directory.
pub fn install_kernel(
    template: &Path,
    kernels_dir: &Path,
    name: &str,
    force: bool,
) -> Result<PathBuf, anyhow::Error> {
    if !template.join(KERNEL_SPEC_FILE).is_file() {
        return Err(anyhow::anyhow!(
            "Kernel template {} has no {}",
            template.display(),
            KERNEL_SPEC_FILE
        ));
    }

    let kernel_dir = kernels_dir.join(name);
    if std::path::absolute(&kernel_dir)?.starts_with(std::path::absolute(template)?) {
        return Err(anyhow::anyhow!(
            "Cannot install kernel {} inside its own template {}",
            name,
            template.display()
        ));
    }
    if kernel_dir.exists() {
        if !force {
            return Err(anyhow::anyhow!(
                "There is already a kernel with name {}; specify a different name or use --force to overwrite it",
                name
            ));
        }
        log::warn!("Overwriting existing kernel at {}", kernel_dir.display());
        fs::remove_dir_all(&kernel_dir)
            .with_context(|| format!("Failed to remove {}", kernel_dir.display()))?;
    }

    log::info!("Installing kernel to {}", kernel_dir.display());
    copy_dir(template, &kernel_dir)?;

    let kernel_dir = std::path::absolute(&kernel_dir)?;
    substitute_kernel_dir(&kernel_dir)?;
    Ok(kernel_dir)
}

/// Set the display name of an installed kernel and merge variables into its
/// env block.
pub fn update_kernel_spec<I>(
    kernel_dir: &Path,
    display_name: &str,
    env: I,
) -> Result<KernelSpec, anyhow::Error>
where
    I: IntoIterator<Item = (String, String)>,
{
    let spec_path = kernel_dir.join(KERNEL_SPEC_FILE);
    let mut spec = read_spec(&spec_path)?;
    spec.display_name = display_name.to_string();
    spec.merge_env(env);
    write_spec(&spec, &spec_path)?;

    let names: Vec<String> = spec.string_env().into_iter().map(|(name, _)| name).collect();
    log::info!(
        "Kernel '{}' at {} sets environment: {}",
        display_name,
        kernel_dir.display(),
        if names.is_empty() {
            String::from("(none)")
        } else {
            names.join(", ")
        }
    );
    Ok(spec)
}

/// Replace the kernel directory placeholder in the installed spec's argv.
fn substitute_kernel_dir(kernel_dir: &Path) -> Result<(), anyhow::Error> {
    let spec_path = kernel_dir.join(KERNEL_SPEC_FILE);
    let mut spec = read_spec(&spec_path)?;
    if !spec.argv.iter().any(|arg| arg.contains(KERNEL_DIR_PLACEHOLDER)) {
        return Ok(());
    }

    let dir = kernel_dir.to_string_lossy();
    spec.argv = spec
        .argv
        .iter()
        .map(|arg| arg.replace(KERNEL_DIR_PLACEHOLDER, &dir))
        .collect();
    write_spec(&spec, &spec_path)
}

fn read_spec(path: &Path) -> Result<KernelSpec, anyhow::Error> {
    KernelSpec::from_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to read kernel spec {}: {}", path.display(), e))
}

fn write_spec(spec: &KernelSpec, path: &Path) -> Result<(), anyhow::Error> {
    spec.to_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to write kernel spec {}: {}", path.display(), e))
}

fn copy_dir(from: &Path, to: &Path) -> Result<(), anyhow::Error> {
    fs::create_dir_all(to).with_context(|| format!("Failed to create {}", to.display()))?;
    for entry in fs::read_dir(from).with_context(|| format!("Failed to read {}", from.display()))? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
        }
    }
    Ok(())
}
