use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hfp::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hfp=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            model,
            port,
            host,
            config,
        } => {
            hfp::cli::serve(model, port, host, config).await?;
        }
        Commands::Predict { model, input } => {
            hfp::cli::predict(model, input).await?;
        }
        Commands::Info { model } => {
            hfp::cli::info(model).await?;
        }
    }

    Ok(())
}
