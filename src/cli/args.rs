//! CLI argument definitions
//!
//! Uses clap derive macros for argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// hangar - Desktop launcher for flight-sim add-on groups
#[derive(Parser, Debug)]
#[command(name = "hangar")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Use an explicit configuration file instead of ~/.hangar/config.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one catalog refresh cycle and print a summary
    Sync,

    /// Fetch the catalog and print the decoded document as JSON
    Dump {
        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Encode a JSON catalog document into the compressed wire format
    Pack {
        /// Input JSON document
        input: PathBuf,
        /// Output payload path
        output: PathBuf,
    },

    /// List well-known product codes
    Groups,
}
