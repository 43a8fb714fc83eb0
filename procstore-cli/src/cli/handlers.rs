// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for procstore

use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::commands::OutputFormat;
use super::output::CatalogFormatter;
use procstore::exec::DetachedEngine;
use procstore::{
    CallableCoordinator, CallableKind, CatalogConfig, DefinitionRequest, InputDeclaration,
    LifecycleState,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Fields shared by both define commands
pub struct DefineArgs {
    pub name: String,
    pub statement: String,
    pub mode: String,
    pub returns: Option<String>,
    pub outputs: Vec<String>,
    pub inputs: Vec<String>,
    pub force_single: bool,
    pub description: Option<String>,
}

/// Open the database with a detached engine
///
/// Administration never runs statements, so no host engine is attached.
fn open_coordinator(
    path: &Path,
    config: Option<&Path>,
) -> Result<Arc<CallableCoordinator>, Box<dyn std::error::Error>> {
    let config = match config {
        Some(file) => CatalogConfig::from_json_file(file)?,
        None => CatalogConfig::default(),
    };

    let coordinator =
        CallableCoordinator::from_path_with_config(path, config, Arc::new(DetachedEngine))?;

    if coordinator.lifecycle_state() == LifecycleState::Failed {
        println!(
            "{}",
            "Catalog failed to load; definitions are read-only until a reload succeeds".yellow()
        );
    }
    Ok(coordinator)
}

/// Parse `name:type[=default]`
pub fn parse_input(spec: &str) -> Result<InputDeclaration, String> {
    let (name, rest) = spec
        .split_once(':')
        .ok_or_else(|| format!("Input '{}' must be written name:type[=default]", spec))?;

    let input = match rest.split_once('=') {
        Some((type_token, default)) => {
            InputDeclaration::new(name.trim(), type_token.trim()).with_default(default.trim())
        }
        None => InputDeclaration::new(name.trim(), rest.trim()),
    };
    Ok(input)
}

/// Parse `name:type`
pub fn parse_output(spec: &str) -> Result<(String, String), String> {
    spec.split_once(':')
        .map(|(name, type_token)| (name.trim().to_string(), type_token.trim().to_string()))
        .ok_or_else(|| format!("Output '{}' must be written name:type", spec))
}

fn build_request(args: DefineArgs) -> Result<DefinitionRequest, String> {
    let mut request = DefinitionRequest::new(args.name, args.statement)
        .mode(args.mode)
        .force_single(args.force_single);

    if let Some(type_token) = args.returns {
        request = request.returns(type_token);
    }
    for spec in &args.outputs {
        let (name, type_token) = parse_output(spec)?;
        request = request.output(name, type_token);
    }
    for spec in &args.inputs {
        request = request.input(parse_input(spec)?);
    }
    if let Some(description) = args.description {
        request = request.description(description);
    }
    Ok(request)
}

/// Handle define-procedure and define-function
pub fn handle_define(
    kind: CallableKind,
    path: PathBuf,
    config: Option<PathBuf>,
    args: DefineArgs,
) -> CliResult {
    let request = build_request(args)?;
    let coordinator = open_coordinator(&path, config.as_deref())?;

    let defined = match kind {
        CallableKind::Procedure => coordinator.declare_procedure(&request),
        CallableKind::Function => coordinator.declare_function(&request),
    };
    let result = match defined {
        Ok(definition) => {
            println!("{}", format!("✅ Defined {} {}", kind, definition.name).green());
            println!(
                "   {}",
                definition.signature(coordinator.catalog().namespace()).cyan()
            );
            Ok(())
        }
        Err(e) => Err(format!("Failed to define {}: {}", kind, e).into()),
    };

    coordinator.shutdown()?;
    result
}

/// Handle the remove command
pub fn handle_remove(
    kind: CallableKind,
    name: String,
    path: PathBuf,
    config: Option<PathBuf>,
) -> CliResult {
    let coordinator = open_coordinator(&path, config.as_deref())?;

    let result = match coordinator.remove(kind, &name) {
        Ok(()) => {
            println!("{}", format!("✅ Removed {} {}", kind, name).green());
            Ok(())
        }
        Err(e) => Err(format!("Failed to remove {} {}: {}", kind, name, e).into()),
    };

    coordinator.shutdown()?;
    result
}

/// Handle the list command
pub fn handle_list(path: PathBuf, config: Option<PathBuf>, format: OutputFormat) -> CliResult {
    let coordinator = open_coordinator(&path, config.as_deref())?;
    let callables = coordinator.list();
    print!("{}", CatalogFormatter::format_listing(&callables, format));
    coordinator.shutdown()?;
    Ok(())
}

/// Handle the reload command
pub fn handle_reload(path: PathBuf, config: Option<PathBuf>) -> CliResult {
    let coordinator = open_coordinator(&path, config.as_deref())?;

    let result = match coordinator.reload() {
        Ok(report) => {
            print!("{}", CatalogFormatter::format_report(&report));
            Ok(())
        }
        Err(e) => Err(format!("Reload failed: {}", e).into()),
    };

    coordinator.shutdown()?;
    result
}
