// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command line definitions for procstore

use clap::{Parser, Subcommand, ValueEnum};
use procstore::CallableKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "procstore",
    about = "Manage durable user-defined procedures and functions",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (overridden by --verbose)
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// JSON catalog configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Define or replace a procedure
    DefineProcedure {
        /// Procedure name, optionally dotted
        name: String,

        /// Statement executed on each call
        statement: String,

        /// Path to the database directory
        #[arg(long, default_value = "./procstore.db")]
        path: PathBuf,

        /// Access mode: read or write
        #[arg(long, default_value = "read")]
        mode: String,

        /// Output column as name:type (repeatable)
        #[arg(long = "output")]
        outputs: Vec<String>,

        /// Input parameter as name:type[=default] (repeatable)
        #[arg(long = "input")]
        inputs: Vec<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Define or replace a function
    DefineFunction {
        /// Function name, optionally dotted
        name: String,

        /// Statement executed on each call
        statement: String,

        /// Path to the database directory
        #[arg(long, default_value = "./procstore.db")]
        path: PathBuf,

        /// Access mode: read or write
        #[arg(long, default_value = "read")]
        mode: String,

        /// Scalar result type
        #[arg(long, conflicts_with = "outputs")]
        returns: Option<String>,

        /// Output column as name:type (repeatable)
        #[arg(long = "output")]
        outputs: Vec<String>,

        /// Input parameter as name:type[=default] (repeatable)
        #[arg(long = "input")]
        inputs: Vec<String>,

        /// Return only the first row instead of collecting all rows
        #[arg(long)]
        force_single: bool,

        #[arg(long)]
        description: Option<String>,
    },

    /// Remove a procedure or function
    Remove {
        name: String,

        #[arg(long, value_enum)]
        kind: KindArg,

        /// Path to the database directory
        #[arg(long, default_value = "./procstore.db")]
        path: PathBuf,
    },

    /// List every defined callable
    List {
        /// Path to the database directory
        #[arg(long, default_value = "./procstore.db")]
        path: PathBuf,

        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Rebuild the catalog from the persisted blob and report what loaded
    Reload {
        /// Path to the database directory
        #[arg(long, default_value = "./procstore.db")]
        path: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    Procedure,
    Function,
}

impl From<KindArg> for CallableKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Procedure => CallableKind::Procedure,
            KindArg::Function => CallableKind::Function,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}
