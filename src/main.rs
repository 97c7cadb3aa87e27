use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use img_batch::cli::{
    execute_compare, execute_run, Cli, Commands, CompareConfig, EngineSettings, RunConfig,
};
use img_batch::core::RunnerMode;
use img_batch::services::OutputFormat;

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG未指定時は警告以上のみ
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input_directory,
            output_directory,
            mode,
            workers,
            format,
            delay_ms,
            report,
            quiet,
        } => {
            let config = RunConfig {
                input_directory,
                output_directory,
                report,
                engine: EngineSettings {
                    mode: mode.into(),
                    workers,
                    format: format.into(),
                    delay: Duration::from_millis(delay_ms),
                    quiet,
                },
            };
            execute_run(config).await
        }
        Commands::Compare {
            input_directory,
            workers,
            delay_ms,
        } => {
            let config = CompareConfig {
                input_directory,
                engine: EngineSettings {
                    mode: RunnerMode::Concurrent,
                    workers,
                    format: OutputFormat::default(),
                    delay: Duration::from_millis(delay_ms),
                    quiet: true,
                },
            };
            execute_compare(config).await.map(|_| ())
        }
    }
}
