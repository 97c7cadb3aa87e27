use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "img_batch")]
#[command(about = "Upscale and contrast-enhance every image in a directory, sequentially or concurrently")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transform every image in a directory and write the results
    Run {
        /// Directory containing the source images
        input_directory: PathBuf,

        /// Directory to write processed images into
        #[arg(default_value = "output")]
        output_directory: PathBuf,

        /// Execution mode
        #[arg(short, long, value_enum, default_value = "concurrent")]
        mode: RunnerModeArg,

        /// Number of concurrent workers (default: CPU count x 2)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Output encoding
        #[arg(short, long, value_enum, default_value = "jpeg")]
        format: OutputFormatArg,

        /// Artificial delay per image in milliseconds
        #[arg(long, default_value = "0")]
        delay_ms: u64,

        /// Write a JSON summary of the run to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run both modes on the same directory and compare outputs and timings
    Compare {
        /// Directory containing the source images
        input_directory: PathBuf,

        /// Number of concurrent workers (default: CPU count x 2)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Artificial delay per image in milliseconds
        #[arg(long, default_value = "0")]
        delay_ms: u64,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunnerModeArg {
    Sequential,
    Concurrent,
}

impl From<RunnerModeArg> for crate::core::RunnerMode {
    fn from(mode: RunnerModeArg) -> Self {
        match mode {
            RunnerModeArg::Sequential => Self::Sequential,
            RunnerModeArg::Concurrent => Self::Concurrent,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormatArg {
    Jpeg,
    Png,
}

impl From<OutputFormatArg> for crate::services::OutputFormat {
    fn from(format: OutputFormatArg) -> Self {
        match format {
            OutputFormatArg::Jpeg => Self::Jpeg,
            OutputFormatArg::Png => Self::Png,
        }
    }
}
