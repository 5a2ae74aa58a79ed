use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "flomo-md")]
#[command(version, about = "Convert a flomo HTML export into one Markdown journal")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert an export directory into flomo-output.md plus an image folder
    Convert {
        /// Directory holding the exported .html/.htm files
        source: PathBuf,

        /// Output directory (a fresh temp directory when omitted)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// YAML file overriding selectors or output names
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Clear a non-empty output directory first
        #[arg(long)]
        force: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether a directory looks like a flomo export, without writing anything
    Check {
        /// Directory holding the exported .html/.htm files
        source: PathBuf,

        /// YAML file overriding selectors
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
