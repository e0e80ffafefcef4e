//
// env_names.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

// These names are the contract between the values written into a kernel's
// `kernel.json` env block at registration time and the values the launcher
// reads when the kernel starts.

/// Standard JVM options
pub const JAVA_OPTS: &str = "JAVA_OPTS";

/// Kernel-specific JVM options; replaces `JAVA_OPTS` as the base layer
pub const KERNEL_JAVA_OPTS: &str = "KOTLIN_JUPYTER_JAVA_OPTS";

/// JVM options appended after the base layer
pub const KERNEL_EXTRA_JAVA_OPTS: &str = "KOTLIN_JUPYTER_JAVA_OPTS_EXTRA";

/// JVM options added by `add-kernel`; appended last
pub const KERNEL_INTERNAL_ADDED_JAVA_OPTS: &str = "KOTLIN_JUPYTER_KERNEL_EXTRA_JVM_OPTS";

/// Standard Java home
pub const JAVA_HOME: &str = "JAVA_HOME";

/// Kernel-specific Java home; replaces `JAVA_HOME`
pub const KERNEL_JAVA_HOME: &str = "KOTLIN_JUPYTER_JAVA_HOME";

/// Explicit path to the `java` executable; beats both homes
pub const KERNEL_JAVA_EXECUTABLE: &str = "KOTLIN_JUPYTER_JAVA_EXECUTABLE";

/// Every variable the launcher reads, in no particular order.
pub const ALL: [&str; 7] = [
    JAVA_OPTS,
    KERNEL_JAVA_OPTS,
    KERNEL_EXTRA_JAVA_OPTS,
    KERNEL_INTERNAL_ADDED_JAVA_OPTS,
    JAVA_HOME,
    KERNEL_JAVA_HOME,
    KERNEL_JAVA_EXECUTABLE,
];

/// Variables that `add-kernel` manages itself and refuses to take from
/// `--env`.
pub const RESERVED_FOR_REGISTRATION: [&str; 5] = [
    JAVA_HOME,
    KERNEL_JAVA_HOME,
    JAVA_OPTS,
    KERNEL_EXTRA_JAVA_OPTS,
    KERNEL_INTERNAL_ADDED_JAVA_OPTS,
];
