//
// error.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

use std::fmt;
use std::path::PathBuf;

use log::error;

/// Everything that can stop a kernel launch. None of these are retried.
#[derive(Debug)]
pub enum LaunchError {
    ManifestNotFound(PathBuf),
    ManifestUnreadable(PathBuf, std::io::Error),
    ManifestMalformed(PathBuf, String),
    OptionsParseError(&'static str),
    NoPortAvailable { first: u16, last: u16 },
    MainJarNotFound(PathBuf),
    ChildProcessError(String, std::io::Error),
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error KL-{}: ", self.discriminant())?;
        match self {
            LaunchError::ManifestNotFound(path) => {
                write!(f, "Launch manifest {} does not exist", path.display())
            }
            LaunchError::ManifestUnreadable(path, err) => {
                write!(f, "Failed to read launch manifest {}: {}", path.display(), err)
            }
            LaunchError::ManifestMalformed(path, reason) => {
                write!(f, "Launch manifest {} is malformed: {}", path.display(), reason)
            }
            LaunchError::OptionsParseError(variable) => {
                write!(
                    f,
                    "Failed to split JVM options in {}: unbalanced quotes or trailing escape",
                    variable
                )
            }
            LaunchError::NoPortAvailable { first, last } => {
                write!(f, "No free debug port in range {}-{}", first, last)
            }
            LaunchError::MainJarNotFound(path) => {
                write!(f, "Kernel main jar {} does not exist", path.display())
            }
            LaunchError::ChildProcessError(executable, err) => {
                write!(f, "Failed to start kernel process '{}': {}", executable, err)
            }
        }
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LaunchError::ManifestUnreadable(_, err) | LaunchError::ChildProcessError(_, err) => {
                Some(err)
            }
            _ => None,
        }
    }
}

impl LaunchError {
    fn discriminant(&self) -> u8 {
        match self {
            LaunchError::ManifestNotFound(_) => 0,
            LaunchError::ManifestUnreadable(_, _) => 1,
            LaunchError::ManifestMalformed(_, _) => 2,
            LaunchError::OptionsParseError(_) => 3,
            LaunchError::NoPortAvailable { .. } => 4,
            LaunchError::MainJarNotFound(_) => 5,
            LaunchError::ChildProcessError(_, _) => 6,
        }
    }

    pub fn log(&self) {
        error!("{}", self);
    }
}
