//
// kernel_spec.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The name of the kernel spec file inside a kernel directory.
pub const KERNEL_SPEC_FILE: &str = "kernel.json";

/// From the Jupyter documentation for [Kernel Specs](https://jupyter-client.readthedocs.io/en/stable/kernels.html#kernel-specs).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct KernelSpec {
    /// List of command line arguments to be used to start the kernel
    pub argv: Vec<String>,

    // The kernel name as it should be displayed in the UI
    pub display_name: String,

    // The kernel's language
    pub language: String,

    // Environment variables to set for the kernel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<serde_json::Map<String, Value>>,

    // Anything else in the file (interrupt_mode, metadata, ...), kept so
    // that rewriting the spec doesn't drop it
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl KernelSpec {
    /// Parse a kernel spec from a `kernel.json` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let spec = serde_json::from_reader(reader)?;
        Ok(spec)
    }

    /// Write the kernel spec back out as pretty-printed JSON.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn Error + Send + Sync>> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Merge string environment variables into the spec's env block,
    /// creating the block if the spec doesn't have one. Existing variables
    /// with the same name are replaced.
    pub fn merge_env<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let env = self.env.get_or_insert_with(serde_json::Map::new);
        for (key, value) in vars {
            env.insert(key.into(), Value::String(value.into()));
        }
    }

    /// Returns the string-valued environment variables of the spec; values
    /// of any other JSON type are skipped.
    pub fn string_env(&self) -> Vec<(String, String)> {
        match &self.env {
            Some(env) => env
                .iter()
                .filter_map(|(key, value)| value.as_str().map(|v| (key.clone(), v.to_string())))
                .collect(),
            None => Vec::new(),
        }
    }
}
