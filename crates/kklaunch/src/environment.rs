//
// environment.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

//! Resolution of the Java executable and JVM options from the environment.

use std::collections::HashMap;
use std::path::PathBuf;

use kkshared::env_names;

use crate::error::LaunchError;

/// Name of the Java launcher inside `<java home>/bin`.
#[cfg(target_os = "windows")]
pub const JAVA_BINARY: &str = "java.exe";
#[cfg(not(target_os = "windows"))]
pub const JAVA_BINARY: &str = "java";

/// The launch-relevant environment variables, captured once at startup so
/// that resolution never reads process globals.
///
/// Variables that are set but empty are treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KernelEnv {
    pub java_opts: Option<String>,
    pub kernel_java_opts: Option<String>,
    pub extra_java_opts: Option<String>,
    pub internal_java_opts: Option<String>,
    pub java_home: Option<String>,
    pub kernel_java_home: Option<String>,
    pub java_executable: Option<String>,
}

impl KernelEnv {
    /// Capture the variables from the current process environment.
    pub fn from_process_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Capture the variables from an explicit map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        Self::from_lookup(|name| vars.get(name).cloned())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());
        Self {
            java_opts: get(env_names::JAVA_OPTS),
            kernel_java_opts: get(env_names::KERNEL_JAVA_OPTS),
            extra_java_opts: get(env_names::KERNEL_EXTRA_JAVA_OPTS),
            internal_java_opts: get(env_names::KERNEL_INTERNAL_ADDED_JAVA_OPTS),
            java_home: get(env_names::JAVA_HOME),
            kernel_java_home: get(env_names::KERNEL_JAVA_HOME),
            java_executable: get(env_names::KERNEL_JAVA_EXECUTABLE),
        }
    }
}

/// The Java executable and JVM options to launch the kernel with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedEnvironment {
    /// Explicit executable path, used verbatim
    pub java_executable: Option<String>,

    /// Java home whose `bin/java` is used when no executable is given
    pub java_home: Option<String>,

    /// Tokenized JVM options, in layer order
    pub jvm_options: Vec<String>,
}

impl ResolvedEnvironment {
    /// The program to run: the explicit executable, else `bin/java` under the
    /// Java home, else `java` from the search path.
    pub fn java_command(&self) -> String {
        if let Some(executable) = &self.java_executable {
            return executable.clone();
        }
        match &self.java_home {
            Some(home) => PathBuf::from(home)
                .join("bin")
                .join(JAVA_BINARY)
                .to_string_lossy()
                .into_owned(),
            None => String::from("java"),
        }
    }
}

/// Resolve the Java executable and JVM options from the captured environment.
///
/// JVM options are built from layers, each split into words on its own and
/// appended in order:
///
/// 1. `KOTLIN_JUPYTER_JAVA_OPTS`, or `JAVA_OPTS` if that is unset
/// 2. `KOTLIN_JUPYTER_JAVA_OPTS_EXTRA`
/// 3. `KOTLIN_JUPYTER_KERNEL_EXTRA_JVM_OPTS`
pub fn resolve(env: &KernelEnv) -> Result<ResolvedEnvironment, LaunchError> {
    let base = match (&env.kernel_java_opts, &env.java_opts) {
        (Some(opts), _) => Some((env_names::KERNEL_JAVA_OPTS, opts)),
        (None, Some(opts)) => Some((env_names::JAVA_OPTS, opts)),
        (None, None) => None,
    };

    let layers = [
        base,
        env.extra_java_opts
            .as_ref()
            .map(|opts| (env_names::KERNEL_EXTRA_JAVA_OPTS, opts)),
        env.internal_java_opts
            .as_ref()
            .map(|opts| (env_names::KERNEL_INTERNAL_ADDED_JAVA_OPTS, opts)),
    ];

    let mut jvm_options = Vec::new();
    for (variable, opts) in layers.into_iter().flatten() {
        let words = shlex::split(&escape_comment_starts(opts))
            .ok_or(LaunchError::OptionsParseError(variable))?;
        log::trace!("JVM options from {}: {:?}", variable, words);
        jvm_options.extend(words);
    }

    let java_home = env.kernel_java_home.clone().or_else(|| env.java_home.clone());

    let resolved = ResolvedEnvironment {
        java_executable: env.java_executable.clone(),
        java_home,
        jvm_options,
    };
    log::debug!("Resolved Java command: {}", resolved.java_command());
    Ok(resolved)
}

/// Backslash-escape every unquoted `#` that starts a word.
///
/// `shlex` treats such a `#` as the start of a comment and drops the rest of
/// the string; JVM options are plain words, so `#tag` must stay a token.
fn escape_comment_starts(opts: &str) -> String {
    let mut escaped = String::with_capacity(opts.len());
    let mut quote: Option<char> = None;
    let mut after_backslash = false;
    let mut word_start = true;

    for c in opts.chars() {
        match quote {
            Some(q) => {
                if after_backslash {
                    after_backslash = false;
                } else if c == '\\' && q == '"' {
                    after_backslash = true;
                } else if c == q {
                    quote = None;
                }
                word_start = false;
            }
            None => {
                if after_backslash {
                    after_backslash = false;
                    word_start = false;
                } else if c == '\\' {
                    after_backslash = true;
                    word_start = false;
                } else if c == '\'' || c == '"' {
                    quote = Some(c);
                    word_start = false;
                } else if c.is_whitespace() {
                    word_start = true;
                } else {
                    if c == '#' && word_start {
                        escaped.push('\\');
                    }
                    word_start = false;
                }
            }
        }
        escaped.push(c);
    }

    escaped
}
