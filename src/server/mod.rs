//! HTTP serving layer
//!
//! REST API over the inference core: prediction by passenger identifier,
//! retraining, model metadata, health. Corpus and model loading happen at
//! startup or on an explicit retrain; the hot prediction path performs no
//! I/O.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use state::AppState;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::artifact::{ArtifactStore, FsArtifactStore, ModelArtifact};
use crate::data::{load_corpus, FsCorpusSource};
use crate::error::Result;
use crate::inference::InferenceEngine;
use crate::lookup::LookupStore;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_path: PathBuf,
    pub model_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8001),
            data_path: std::env::var("DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/titanic.csv")),
            model_path: std::env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./models/titanic_model.json")),
        }
    }
}

/// Build the serving snapshot from the persisted artifact and the corpus
fn bootstrap(config: &ServerConfig) -> Result<InferenceEngine> {
    let store = FsArtifactStore::new(&config.model_path);
    let artifact = ModelArtifact::from_bytes(&store.fetch()?)?;

    let records = load_corpus(&FsCorpusSource::new(&config.data_path))?;
    let lookup = LookupStore::build(&records, artifact.preprocessor.schema());

    Ok(InferenceEngine::new(artifact, lookup))
}

/// Start the server with the given configuration
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config.clone()));

    match bootstrap(&config) {
        Ok(engine) => {
            info!(
                model_path = %config.model_path.display(),
                known_passengers = engine.lookup().len(),
                "model loaded"
            );
            state.install(engine).await;
        }
        Err(e) => {
            warn!(error = %e, "starting without a loaded model; POST /api/train to publish one");
        }
    }

    let app = create_router(Arc::clone(&state));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, "Titanic survival predictor listening");
    info!(url = %format!("http://{}/api/health", addr), "Health endpoint available");

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Shutdown signal received, stopping server gracefully");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8001);
        assert!(!config.host.is_empty());
    }
}
