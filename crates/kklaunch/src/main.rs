//
// main.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

//! kklaunch
//!
//! Starts the Kotlin Jupyter kernel JVM for a notebook front-end.

use std::fs::File;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger};

use kklaunch::command::{self, KernelPaths, LaunchCommand};
use kklaunch::environment::{self, KernelEnv};
use kklaunch::error::LaunchError;
use kklaunch::manifest::LaunchManifest;
use kklaunch::process::{self, ExitOutcome, INTERRUPTED_EXIT_CODE};
use kkshared::port_picker::{BindProbe, ConnectProbe};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The Jupyter connection file supplied by the front-end. Passed to the
    /// kernel unchanged.
    connection_file: String,

    /// The launch manifest. Defaults to `<install dir>/config/jar_args.json`.
    jar_args_file: Option<PathBuf>,

    /// The directory containing the kernel's `jars` directory. Defaults to
    /// the install directory.
    executables_dir: Option<PathBuf>,

    /// The kernel installation directory. Defaults to the directory
    /// containing this executable.
    #[arg(long)]
    install_dir: Option<PathBuf>,

    /// Pick a generated debug port by binding candidate ports instead of
    /// connecting to them. Avoids picking a port another process is about to
    /// listen on, but may skip ports that a connect probe would accept.
    #[arg(long)]
    bind_probe: bool,

    /// The path to a log file. If specified, log output will be written to this
    /// file in addition to standard error.
    #[arg(long)]
    log_file: Option<String>,

    /// The log level to use. Valid values are "trace", "debug", "info", "warn",
    /// and "error". If not specified, the default log level is "info", or the
    /// value of `RUST_LOG` if set.
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_logging(args: &Args) {
    // Derive the log level
    let log_level = match args.log_level {
        Some(ref level) => level.to_string(),
        None => std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
    };

    // Match the log level to a `LevelFilter`
    let log_level = match log_level.as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => {
            eprintln!("Invalid log level '{}'; using 'info'", log_level);
            LevelFilter::Info
        }
    };

    // Log to stderr; the kernel owns stdout
    let term_logger = TermLogger::new(
        log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let result = match args.log_file {
        Some(ref log_file) => {
            let file = match File::create(log_file) {
                Ok(file) => file,
                Err(err) => {
                    eprintln!("Failed to create log file '{}': {}", log_file, err);
                    std::process::exit(1);
                }
            };
            CombinedLogger::init(vec![
                term_logger,
                WriteLogger::new(log_level, Config::default(), file),
            ])
        }
        None => CombinedLogger::init(vec![term_logger]),
    };

    // Consider it a fatal error if we can't initialize logging
    if let Err(err) = result {
        eprintln!("Failed to initialize logging: {}", err);
        std::process::exit(1);
    }
}

/// The directory containing the running executable.
fn default_install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn build_command(args: &Args) -> Result<LaunchCommand, LaunchError> {
    let install_dir = args.install_dir.clone().unwrap_or_else(default_install_dir);
    let jar_args_file = args
        .jar_args_file
        .clone()
        .unwrap_or_else(|| install_dir.join("config").join("jar_args.json"));
    let executables_dir = args.executables_dir.clone().unwrap_or(install_dir);

    // Both of these only read; neither depends on the other
    let manifest = LaunchManifest::load(&jar_args_file)?;
    let resolved_env = environment::resolve(&KernelEnv::from_process_env())?;

    let paths = KernelPaths::from_executables_dir(&executables_dir);

    if args.bind_probe {
        command::build(&manifest, &resolved_env, &args.connection_file, &paths, &BindProbe)
    } else {
        command::build(&manifest, &resolved_env, &args.connection_file, &paths, &ConnectProbe)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    init_logging(&args);

    let command = match build_command(&args) {
        Ok(command) => command,
        Err(err) => {
            err.log();
            std::process::exit(1);
        }
    };

    match command.debug_port {
        Some(port) => log::info!("Kernel debugger port: {}", port),
        None => log::debug!("Kernel debugger is not listening on a known port"),
    }

    match process::launch(command).await {
        Ok(ExitOutcome::Exited(code)) => std::process::exit(code),
        Ok(ExitOutcome::Interrupted) => {
            // Leave right away; the kernel handles its own shutdown
            println!("Kernel interrupted");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
        Err(err) => {
            err.log();
            std::process::exit(1);
        }
    }
}
