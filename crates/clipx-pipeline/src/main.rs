//! Clip extraction binary.

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use clipx_pipeline::{ClipPipeline, PipelineConfig};

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Human-readable output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("clipx=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting clipx");

    let config = match PipelineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(e).context("failed to load configuration");
        }
    };
    info!("Pipeline config: {:?}", config);

    let output = ClipPipeline::from_config(config)
        .run()
        .context("clip extraction failed")?;

    if output.is_empty() {
        info!("No scenes extracted");
    } else {
        for (idx, (start, stop)) in output.time_pairs().into_iter().enumerate() {
            info!(scene = idx, start, stop, "Clip bounds");
        }
    }

    Ok(())
}
