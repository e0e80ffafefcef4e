//
// lib.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

//! Shared types and utilities for the Kotlin kernel launcher and installer.

/// Names of the environment variables that configure a kernel launch
pub mod env_names;

/// The Jupyter kernel spec (`kernel.json`)
pub mod kernel_spec;

/// Debug port selection
pub mod port_picker;
