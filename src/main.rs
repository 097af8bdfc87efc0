//! Lifeboat - Main entry point
//!
//! Titanic survival prediction service with CLI and server modes.

use clap::Parser;
use lifeboat::cli::{cmd_predict, cmd_serve, cmd_train, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lifeboat=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            data,
            model,
            test_fraction,
            seed,
        } => {
            cmd_train(&data, &model, test_fraction, seed)?;
        }
        Commands::Predict { model, data, id } => {
            cmd_predict(&model, &data, &id)?;
        }
        Commands::Serve {
            host,
            port,
            data,
            model,
        } => {
            cmd_serve(&host, port, &data, &model).await?;
        }
    }

    Ok(())
}
