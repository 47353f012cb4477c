//! Plansheet CLI library
//!
//! This module contains the core CLI logic for the plansheet metadata tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::{
    fs,
    io::{self, Write},
};

use log::info;
use serde_json::Value;

use plansheet::{MetadataBuilder, NormalizedMeta, PlansheetError, format_issues, key::LayerLocator};

/// Run the plansheet CLI application
///
/// This function loads the metadata file named by `args`, runs the selected
/// command and writes its report to stdout.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `PlansheetError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - JSON syntax errors
/// - Validation errors
/// - Unknown or malformed layer keys
pub fn run(args: &Args) -> Result<(), PlansheetError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(args, &mut out)
}

/// Run the command in `args`, writing its report to `out`.
///
/// # Errors
///
/// See [`run`].
pub fn execute(args: &Args, out: &mut dyn Write) -> Result<(), PlansheetError> {
    info!(input_path = args.input, command:? = args.command; "Processing metadata");

    // Decoding a key needs neither configuration nor input
    if let Command::DecodeKey { key } = &args.command {
        return decode_key(key, out);
    }

    let app_config = config::load_config(args.config.as_ref())?;
    let builder = MetadataBuilder::new(app_config);

    let source = fs::read_to_string(&args.input)?;
    let value: Value = serde_json::from_str(&source)?;

    if args.command == Command::Validate {
        return validate(&builder, &value, out);
    }

    let meta = builder.build(&value)?;
    match &args.command {
        Command::Normalize { output } => normalize(&meta, output.as_deref(), out),
        Command::List { kind } => {
            for entry in meta.navigation_entries() {
                if kind.is_none_or(|kind| entry.key.kind() == Some(kind)) {
                    writeln!(out, "{}\t{}", entry.key, entry.label)?;
                }
            }
            Ok(())
        }
        Command::Show { key } => {
            let node = meta.require_layer(key)?;
            writeln!(out, "{}", serde_json::to_string_pretty(node)?)?;
            Ok(())
        }
        Command::Overlays { key } => {
            meta.require_layer(key)?;
            for node in meta.overlay_candidates(key) {
                writeln!(out, "{}\t{}", node.key(), node.label())?;
            }
            Ok(())
        }
        Command::Children { parent } => {
            let ids = match parent {
                Some(parent) => meta.children_of(parent),
                None => meta.root_drawings(),
            };
            for id in ids {
                let name = meta.drawing(id).map_or("", |drawing| drawing.name.as_str());
                writeln!(out, "{id}\t{name}")?;
            }
            Ok(())
        }
        Command::Validate | Command::DecodeKey { .. } => Ok(()),
    }
}

/// Process exit status for a failed run.
///
/// A document rejected by validation exits with `2` so scripts can tell it
/// apart from unreadable input or a bad configuration, which exit with `1`.
pub fn exit_code(err: &PlansheetError) -> i32 {
    match err {
        PlansheetError::Validation(_) => 2,
        PlansheetError::Io(_)
        | PlansheetError::Json(_)
        | PlansheetError::Normalize(_)
        | PlansheetError::Key(_)
        | PlansheetError::UnknownLayer(_)
        | PlansheetError::Config(_) => 1,
    }
}

fn validate(builder: &MetadataBuilder, value: &Value, out: &mut dyn Write) -> Result<(), PlansheetError> {
    let validated = builder.validate(value)?;
    writeln!(
        out,
        "valid: {} drawings, {} warnings",
        validated.document.drawings.len(),
        validated.warnings.len()
    )?;
    if !validated.warnings.is_empty() {
        writeln!(out, "{}", format_issues(&validated.warnings))?;
    }
    Ok(())
}

fn normalize(meta: &NormalizedMeta, output: Option<&str>, out: &mut dyn Write) -> Result<(), PlansheetError> {
    let json = serde_json::to_string_pretty(meta)?;
    match output {
        Some(path) => {
            fs::write(path, json)?;
            info!(output_file = path; "Normalized metadata written");
        }
        None => writeln!(out, "{json}")?,
    }
    Ok(())
}

fn decode_key(key: &str, out: &mut dyn Write) -> Result<(), PlansheetError> {
    let locator: LayerLocator = key.parse()?;
    writeln!(out, "kind\t{}", locator.kind())?;
    writeln!(out, "drawing\t{}", locator.drawing_id())?;
    if let Some(discipline) = locator.discipline() {
        writeln!(out, "discipline\t{discipline}")?;
    }
    if let Some(region) = locator.region() {
        writeln!(out, "region\t{region}")?;
    }
    if let Some(revision) = locator.revision() {
        writeln!(out, "revision\t{revision}")?;
    }
    Ok(())
}
