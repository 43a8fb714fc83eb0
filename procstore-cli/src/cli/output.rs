// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog listing and reload report formatting

use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use procstore::{CallableInfo, ReloadReport};

use super::commands::OutputFormat;

/// Formatter for catalog listings and reload reports
pub struct CatalogFormatter;

impl CatalogFormatter {
    /// Format a listing in the specified format
    pub fn format_listing(callables: &[CallableInfo], format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::listing_table(callables),
            OutputFormat::Json => Self::listing_json(callables),
        }
    }

    fn listing_table(callables: &[CallableInfo]) -> String {
        if callables.is_empty() {
            return format!("{}\n", "No callables defined".yellow());
        }

        let mut output = String::new();
        output.push_str(&format!("{}\n", "Callables".bold().green()));
        output.push_str(&format!("Defined: {}\n\n", callables.len()));

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(
            ["Kind", "Name", "Mode", "Signature", "Description"]
                .iter()
                .map(|h| Cell::new(h).fg(Color::Green))
                .collect::<Vec<_>>(),
        );

        for info in callables {
            let signature = if info.inferred && info.outputs.is_empty() {
                format!("{} (outputs not yet observed)", info.signature)
            } else {
                info.signature.clone()
            };
            table.add_row(vec![
                info.kind.to_string(),
                info.qualified_name.clone(),
                info.mode.to_string(),
                signature,
                info.description.clone().unwrap_or_default(),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    fn listing_json(callables: &[CallableInfo]) -> String {
        let json = serde_json::json!({
            "status": "success",
            "count": callables.len(),
            "callables": callables,
        });

        serde_json::to_string_pretty(&json).unwrap_or_else(|_| {
            "{\"status\": \"error\", \"error\": \"Could not serialize listing to JSON\"}".to_string()
        })
    }

    /// Format the outcome of a reload
    pub fn format_report(report: &ReloadReport) -> String {
        let mut output = String::new();

        if report.blob_absent {
            output.push_str(&format!("{}\n", "No persisted catalog found".yellow()));
        }
        output.push_str(&format!(
            "{} {} procedure(s), {} function(s)\n",
            "Loaded".bold().green(),
            report.loaded_procedures.len(),
            report.loaded_functions.len()
        ));

        if !report.degraded.is_empty() {
            output.push_str(&format!("\n{}\n", "Degraded:".bold().yellow()));
            for (i, record) in report.degraded.iter().enumerate() {
                output.push_str(&format!(
                    "  {}. {} {} ({})\n",
                    i + 1,
                    record.kind,
                    record.name,
                    record.fields.join(", ")
                ));
            }
        }

        if !report.dropped.is_empty() {
            output.push_str(&format!("\n{}\n", "Dropped:".bold().red()));
            for (i, record) in report.dropped.iter().enumerate() {
                output.push_str(&format!(
                    "  {}. {} {}: {}\n",
                    i + 1,
                    record.kind,
                    record.name,
                    record.reason.red()
                ));
            }
        }

        output
    }
}
