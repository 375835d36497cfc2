//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `reposcout`.
#[derive(Debug, Parser)]
#[command(name = "reposcout", version, about = "Clone a repository and map what is in it")]
pub struct Cli {
    /// YAML config file (default: ./reposcout.yaml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base directory for working copies.
    #[arg(long, global = true)]
    pub workdir: Option<PathBuf>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clone a repository into the working directory.
    Acquire {
        /// `https://<host>/<owner>/<repo>` reference.
        reference: String,
    },
    /// Index a local tree.
    Classify {
        /// Root of the tree.
        path: PathBuf,
        /// Print the index as JSON.
        #[arg(long)]
        json: bool,
        /// Ranked candidates to keep.
        #[arg(long)]
        top: Option<usize>,
    },
    /// Acquire a repository, then classify it.
    Run {
        /// `https://<host>/<owner>/<repo>` reference.
        reference: String,
        /// Print the analysis as JSON.
        #[arg(long)]
        json: bool,
        /// Ranked candidates to keep.
        #[arg(long)]
        top: Option<usize>,
        /// Delete the working copy once the analysis is printed.
        #[arg(long)]
        discard: bool,
    },
    /// Summarize one directory without recursing.
    Ls {
        /// Root of the tree.
        path: PathBuf,
        /// Directory relative to the root.
        #[arg(default_value = "")]
        dir: String,
    },
    /// Show the detail report for one file.
    Read {
        /// Root of the tree.
        path: PathBuf,
        /// File relative to the root.
        file: String,
    },
    /// Remove the working directory and every copy in it.
    Clean,
}
