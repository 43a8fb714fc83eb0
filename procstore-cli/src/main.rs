// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! procstore CLI entry point

use clap::Parser;
use colored::Colorize;
use procstore::CallableKind;

mod cli;
use cli::{Cli, Commands, DefineArgs};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments first to get log level
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else if let Some(level) = cli.log_level {
        level.to_level_filter()
    } else {
        // Default to Warn (can still be overridden by RUST_LOG env var)
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let config = cli.config;

    match cli.command {
        Commands::Version => {
            println!("{} {}", "procstore".bold().green(), procstore::VERSION);
            println!("Durable user-defined procedures and functions");
            Ok(())
        }

        Commands::DefineProcedure {
            name,
            statement,
            path,
            mode,
            outputs,
            inputs,
            description,
        } => cli::handle_define(
            CallableKind::Procedure,
            path,
            config,
            DefineArgs {
                name,
                statement,
                mode,
                returns: None,
                outputs,
                inputs,
                force_single: false,
                description,
            },
        ),

        Commands::DefineFunction {
            name,
            statement,
            path,
            mode,
            returns,
            outputs,
            inputs,
            force_single,
            description,
        } => cli::handle_define(
            CallableKind::Function,
            path,
            config,
            DefineArgs {
                name,
                statement,
                mode,
                returns,
                outputs,
                inputs,
                force_single,
                description,
            },
        ),

        Commands::Remove { name, kind, path } => {
            cli::handle_remove(kind.into(), name, path, config)
        }

        Commands::List { path, format } => cli::handle_list(path, config, format),

        Commands::Reload { path } => cli::handle_reload(path, config),
    }
}
