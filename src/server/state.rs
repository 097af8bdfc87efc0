//! Application state management

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::inference::InferenceEngine;

use super::ServerConfig;

/// Application state shared across handlers.
///
/// The serving snapshot is an `Arc<InferenceEngine>` swapped as one unit:
/// handlers clone the Arc out of the read guard, so an in-flight prediction
/// always completes against one consistent artifact + lookup version.
pub struct AppState {
    pub config: ServerConfig,
    snapshot: RwLock<Option<Arc<InferenceEngine>>>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            snapshot: RwLock::new(None),
        }
    }

    /// Publish a freshly built engine, replacing any previous snapshot
    pub async fn install(&self, engine: InferenceEngine) {
        *self.snapshot.write().await = Some(Arc::new(engine));
    }

    /// The currently published snapshot, if a model is loaded
    pub async fn current(&self) -> Option<Arc<InferenceEngine>> {
        self.snapshot.read().await.clone()
    }
}
