// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for procstore
//!
//! Provides commands to define, remove, list and reload the callables
//! persisted in a database directory.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands};
pub use handlers::{handle_define, handle_list, handle_reload, handle_remove, DefineArgs};
