//! CLI definitions for steptrace.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "steptrace",
    version,
    about = "Statement-level execution tracer",
    after_help = "Examples:\n  steptrace run solution.py\n  steptrace run solution.py --entry two_sum --args '[[2, 7, 11, 15], 9]'\n  steptrace run solution.py | steptrace extract"
)]
pub struct Cli {
    /// Log debug details to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Trace a source file and print the marker-delimited payload.
    Run {
        /// Source file to trace.
        file: PathBuf,
        /// Global function to call after the file has run.
        #[arg(long)]
        entry: Option<String>,
        /// Entry arguments as a JSON array.
        #[arg(long, requires = "entry")]
        args: Option<String>,
        /// File whose lines are served to `input()`.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Host prelude loaded before the traced file.
        #[arg(long)]
        prelude: Option<PathBuf>,
        /// TOML file with a `[trace]` table.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Pull the steps out of a captured stream and pretty-print them.
    Extract {
        /// Captured stream (stdin when omitted).
        file: Option<PathBuf>,
    },
}
