//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// mediamind - Turn recorded meetings into transcripts and meeting minutes
#[derive(Parser, Debug)]
#[command(name = "mediamind")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a single media file
    Process {
        /// Media file to process (.mov, .mp4)
        input: PathBuf,

        #[command(flatten)]
        options: RunOptions,

        /// Target number of key points in the minutes
        #[arg(long)]
        max_points: Option<u32>,

        /// Style of the minutes (e.g. concise, detailed)
        #[arg(long)]
        style: Option<String>,
    },

    /// Process every media file in a directory
    Batch {
        /// Directory containing media files
        directory: PathBuf,

        #[command(flatten)]
        options: RunOptions,

        /// Stop at the first file that fails
        #[arg(long)]
        fail_fast: bool,
    },

    /// Check external tools and credentials
    Doctor {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by `process` and `batch`
#[derive(clap::Args, Debug, Clone)]
pub struct RunOptions {
    /// Directory to save output files (defaults to general.output_dir)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Skip generating a summary of the transcript
    #[arg(long)]
    pub no_summary: bool,

    /// Spoken language code, e.g. "en" (defaults to auto-detect)
    #[arg(short, long)]
    pub language: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
