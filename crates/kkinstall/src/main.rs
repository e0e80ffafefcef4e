//
// main.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

//! kkinstall
//!
//! Registers Kotlin kernels in the per-user Jupyter data directory.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use kkinstall::add_kernel::{add_kernel, AddKernelOptions};
use kkinstall::jupyter_dir::{expand_user, user_kernels_dir};
use kkinstall::registration::{
    install_kernel, update_kernel_spec, BASE_DISPLAY_NAME, BASE_KERNEL_NAME,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The kernel template to copy. Defaults to the directory containing
    /// this executable.
    #[arg(long, global = true)]
    template: Option<PathBuf>,

    /// The directory to install kernels into. Defaults to the `kernels`
    /// directory under the Jupyter data directory.
    #[arg(long, global = true)]
    kernels_dir: Option<PathBuf>,

    /// The log level to use. Valid values are "trace", "debug", "info", "warn",
    /// and "error".
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install the base Kotlin kernel
    Install {
        /// Overwrite an existing kernel with the same name
        #[arg(long)]
        force: bool,
    },

    /// Add a kernel with specified JDK, JVM args, and environment
    AddKernel {
        /// The kernel's sub-name. The kernel will be named "Kotlin ($name)".
        /// Will be autodetected if JDK is specified, otherwise required.
        /// Must be file system compatible.
        #[arg(long)]
        name: Option<String>,

        /// The home directory of the JDK to use
        #[arg(long)]
        jdk: Option<PathBuf>,

        /// Add a JVM argument
        #[arg(long = "jvm-arg", value_name = "ARG", allow_hyphen_values = true)]
        jvm_args: Vec<String>,

        /// Add an environment variable
        #[arg(long, num_args = 2, value_names = ["NAME", "VALUE"])]
        env: Vec<String>,

        /// Set JVM args instead of adding them
        #[arg(long)]
        set_jvm_args: bool,

        /// Overwrite an existing kernel with the same name
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => {
            eprintln!("Invalid log level '{}'; using 'info'", level);
            LevelFilter::Info
        }
    };
    if let Err(err) = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize terminal logging: {}", err);
        std::process::exit(1);
    }
}

fn default_template() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn run(args: Args) -> Result<(), anyhow::Error> {
    let template = args.template.unwrap_or_else(default_template);
    let kernels_dir = match args.kernels_dir {
        Some(dir) => dir,
        None => user_kernels_dir()?,
    };

    match args.command {
        Commands::Install { force } => {
            let kernel_dir = install_kernel(&template, &kernels_dir, BASE_KERNEL_NAME, force)?;
            update_kernel_spec(&kernel_dir, BASE_DISPLAY_NAME, Vec::new())?;
            println!("Installed kernel {} to {}", BASE_KERNEL_NAME, kernel_dir.display());
        }
        Commands::AddKernel {
            name,
            jdk,
            jvm_args,
            env,
            set_jvm_args,
            force,
        } => {
            let options = AddKernelOptions {
                name,
                jdk: jdk.map(expand_user).transpose()?,
                jvm_args,
                env: env
                    .chunks_exact(2)
                    .map(|pair| (pair[0].clone(), pair[1].clone()))
                    .collect(),
                set_jvm_args,
                force,
            };
            let added = add_kernel(&options, &template, &kernels_dir)?;
            println!(
                "Installed kernel {} ({}) to {}",
                added.kernel_name,
                added.display_name,
                added.kernel_dir.display()
            );
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(&args.log_level);

    if let Err(err) = run(args) {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}
