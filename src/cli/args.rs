//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ppl-grammar")]
#[command(author, version, about = "Parse and inspect PCBoard Programming Language sources", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubCommand,

    /// TOML config file
    #[arg(long, global = true, env = "PPL_GRAMMAR_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Drop comments from syntax trees
    #[arg(long, global = true)]
    pub no_comments: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum SubCommand {
    /// Print the syntax tree of a PPL source file
    Parse {
        /// Path to the .pps source file
        file: PathBuf,
    },

    /// Parse files and report which ones fail
    Check {
        /// Source files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print highlight classes for every token of a source file
    Highlight {
        /// Path to the .pps source file
        file: PathBuf,
    },

    /// Show information about the loaded grammar
    Info,
}
