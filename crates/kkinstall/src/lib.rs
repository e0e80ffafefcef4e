//
// lib.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

//! Registration of Kotlin kernels with Jupyter.

#![allow(missing_docs)]

pub mod add_kernel;
pub mod jupyter_dir;
pub mod registration;
