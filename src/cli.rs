use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process all MKV files in a directory
    Batch {
        /// Input directory containing MKV files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Output directory for stamped files (created if absent)
        #[arg(short, long)]
        output_dir: PathBuf,
    },

    /// Process a single MKV file
    Process {
        /// Input MKV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the stamped file
        #[arg(short, long)]
        output_dir: PathBuf,
    },

    /// List the tracks of an MKV file
    Tracks {
        /// Input MKV file
        #[arg(short, long)]
        input: PathBuf,
    },
}
