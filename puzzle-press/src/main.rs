//! # Puzzle Press
//!
//! Command-line entry point.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use puzzle_press::{CliArgs, Outcome, PressConfig};

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,puzzle_press=debug,puzzle_renderer=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,puzzle_press=debug,puzzle_renderer=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = PressConfig::from(CliArgs::parse());
    tracing::info!(
        "puzzle-press {} requesting {} x{}",
        puzzle_press::VERSION,
        config.request.kind,
        config.request.puzzle_count
    );

    let workbench = config.workbench().context("failed to set up the workbench")?;
    let outcome = if config.preview {
        workbench.preview(&config.request, &config.style, None).await
    } else {
        workbench.generate(&config.request, &config.style).await
    }
    .context("generation failed")?;

    match outcome {
        Outcome::NothingToRender => tracing::info!("Nothing to render"),
        Outcome::Emitted { kind, paths } => {
            tracing::info!("Emitted {} file(s) for {kind}", paths.len());
            for path in paths {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}
