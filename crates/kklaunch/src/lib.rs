//
// lib.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

//! Resolves the launch configuration of a Kotlin Jupyter kernel and starts
//! its JVM.

#![allow(missing_docs)]

pub mod command;
pub mod environment;
pub mod error;
pub mod manifest;
pub mod process;
