//
// jupyter_dir.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

use std::path::{Path, PathBuf};

use directories::BaseDirs;

/// Overrides the Jupyter data directory, as it does for Jupyter itself.
pub const JUPYTER_DATA_DIR: &str = "JUPYTER_DATA_DIR";

/// The per-user Jupyter data directory.
pub fn jupyter_data_dir() -> Result<PathBuf, anyhow::Error> {
    if let Some(dir) = std::env::var_os(JUPYTER_DATA_DIR).filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    platform_data_dir()
}

#[cfg(target_os = "macos")]
fn platform_data_dir() -> Result<PathBuf, anyhow::Error> {
    // On macOS, Jupyter doesn't follow the XDG Base Directory
    // Specification; it stores its data in `~/Library/Jupyter` instead
    // of the "correct" XDG location in `~/Library/Application Support`.
    let base_dir =
        BaseDirs::new().ok_or_else(|| anyhow::anyhow!("Failed to find the home directory"))?;
    Ok(base_dir.home_dir().join("Library").join("Jupyter"))
}

#[cfg(target_os = "windows")]
fn platform_data_dir() -> Result<PathBuf, anyhow::Error> {
    // Jupyter uses `%APPDATA%\jupyter`, not the `data` subdirectory that
    // `ProjectDirs` would add
    let base_dir =
        BaseDirs::new().ok_or_else(|| anyhow::anyhow!("Failed to find the home directory"))?;
    Ok(base_dir.config_dir().join("jupyter"))
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn platform_data_dir() -> Result<PathBuf, anyhow::Error> {
    let dir = directories::ProjectDirs::from("Jupyter", "", "")
        .ok_or_else(|| anyhow::anyhow!("Failed to find the Jupyter data directory"))?;
    Ok(dir.data_dir().to_path_buf())
}

/// The directory Jupyter searches for per-user kernels.
pub fn user_kernels_dir() -> Result<PathBuf, anyhow::Error> {
    Ok(jupyter_data_dir()?.join("kernels"))
}

/// Expand a leading `~` to the home directory and make the path absolute.
pub fn expand_user<P: AsRef<Path>>(path: P) -> Result<PathBuf, anyhow::Error> {
    let path = path.as_ref();
    let expanded = match path.strip_prefix("~") {
        Ok(rest) => {
            let base_dir = BaseDirs::new()
                .ok_or_else(|| anyhow::anyhow!("Failed to find the home directory"))?;
            base_dir.home_dir().join(rest)
        }
        Err(_) => path.to_path_buf(),
    };
    Ok(std::path::absolute(expanded)?)
}
