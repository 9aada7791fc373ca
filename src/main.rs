//! mediamind - Meeting recordings to transcripts and minutes
//!
//! Entry point for the mediamind CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mediamind::cli::{Cli, Commands};
use mediamind::config::Settings;
use mediamind::summary::SummaryHints;

fn init_logging(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        mediamind::cli::completions::write(shell, &mut std::io::stdout());
        return Ok(());
    }

    // The default log level lives in settings, so the subscriber comes after loading.
    let settings = Settings::load()?;
    let level = if cli.verbose {
        "debug"
    } else {
        settings.general.log_level.as_str()
    };
    init_logging(level);

    match cli.command {
        Commands::Process {
            input,
            options,
            max_points,
            style,
        } => {
            let defaults = settings.summary_hints();
            let hints = SummaryHints {
                max_points: max_points.or(defaults.max_points),
                style: style.or(defaults.style),
            };
            mediamind::cli::commands::process_file(&settings, &input, options, hints).await?;
        }
        Commands::Batch {
            directory,
            options,
            fail_fast,
        } => {
            mediamind::cli::commands::batch_directory(&settings, &directory, options, fail_fast)
                .await?;
        }
        Commands::Doctor { json } => {
            mediamind::cli::commands::run_doctor(&settings, json).await?;
        }
        Commands::Config(config_cmd) => {
            mediamind::cli::commands::config_command(&settings, config_cmd)?;
        }
        Commands::Completions { .. } => unreachable!(),
    }

    Ok(())
}
