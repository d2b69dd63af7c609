//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Multiple-choice quiz runner.
///
/// Presents a set of single- and multi-answer questions, scores the attempt
/// and offers a practice round over the questions you missed.
#[derive(Debug, Parser)]
#[command(name = "quiz", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Take a quiz interactively.
    Run {
        /// Question file (JSON). Defaults to the configured file, then the built-in sample.
        questions: Option<PathBuf>,
    },

    /// Validate a question file and list its questions.
    Check {
        /// Question file (JSON).
        questions: PathBuf,
    },
}
