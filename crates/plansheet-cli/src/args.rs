//! Command-line argument definitions for the plansheet CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the metadata file, the configuration
//! file, the logging verbosity and the [`Command`] to run.

use clap::{Parser, Subcommand};

use plansheet::key::LayerKind;

/// Command-line arguments for the plansheet metadata tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the metadata JSON file
    #[arg(short, long, global = true, default_value = "metadata.json")]
    pub input: String,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do with the metadata file.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Check the document and print any warnings
    Validate,

    /// Print the normalized layer graph as JSON
    Normalize {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List layers in navigation order
    List {
        /// Only list layers of this kind (drawing, discipline, region, revision)
        #[arg(short, long)]
        kind: Option<LayerKind>,
    },

    /// Print one layer as JSON
    Show {
        /// Layer key, e.g. `discipline:101:구조`
        key: String,
    },

    /// List layers that can be overlaid on a base layer
    Overlays {
        /// Key of the base layer
        key: String,
    },

    /// List child drawings of a drawing, or the top-level drawings
    Children {
        /// Parent drawing id
        parent: Option<String>,
    },

    /// Split a layer key into its parts
    DecodeKey {
        /// Layer key to decode
        key: String,
    },
}
