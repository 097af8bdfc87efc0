//! HTTP request handlers

use std::path::PathBuf;
use std::sync::Arc;
use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::artifact::{ArtifactStore, FsArtifactStore};
use crate::data::{load_corpus, FsCorpusSource};
use crate::inference::{InferenceEngine, Verdict};
use crate::lookup::LookupStore;
use crate::schema::Schema;
use crate::training::{Trainer, TrainerConfig, TrainingReport};

use super::error::{Result, ServerError};
use super::state::AppState;

/// Passenger identifier as received on the wire: string or integer form
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PassengerId {
    Text(String),
    Number(i64),
}

impl PassengerId {
    fn to_raw(&self) -> String {
        match self {
            PassengerId::Text(s) => s.clone(),
            PassengerId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(rename = "PassengerId")]
    pub passenger_id: PassengerId,
}

/// Predict survival for a passenger looked up by identifier
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<Verdict>> {
    let engine = state
        .current()
        .await
        .ok_or_else(|| ServerError::NotFound("No model loaded".to_string()))?;

    let verdict = engine.predict(&request.passenger_id.to_raw())?;
    Ok(Json(verdict))
}

#[derive(Debug, Default, Deserialize)]
pub struct TrainRequest {
    pub data_path: Option<String>,
    pub test_fraction: Option<f64>,
    pub seed: Option<u64>,
}

/// Retrain and publish a new model.
///
/// Strict order: fetch corpus → train → persist artifact → rebuild lookup →
/// swap the serving snapshot. Nothing is published unless every prior step
/// succeeded.
pub async fn train(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TrainRequest>,
) -> Result<Json<serde_json::Value>> {
    let data_path = request
        .data_path
        .map(PathBuf::from)
        .unwrap_or_else(|| state.config.data_path.clone());
    let model_path = state.config.model_path.clone();

    let mut trainer_config = TrainerConfig::default();
    if let Some(test_fraction) = request.test_fraction {
        trainer_config.test_fraction = test_fraction;
    }
    if let Some(seed) = request.seed {
        trainer_config.seed = seed;
    }

    let (engine, report) = tokio::task::spawn_blocking(
        move || -> crate::error::Result<(InferenceEngine, TrainingReport)> {
            let records = load_corpus(&FsCorpusSource::new(&data_path))?;
            let schema = Schema::titanic();

            let (artifact, report) = Trainer::new(trainer_config).run(&records, &schema)?;
            FsArtifactStore::new(&model_path).store(&artifact.to_bytes()?)?;

            let lookup = LookupStore::build(&records, &schema);
            Ok((InferenceEngine::new(artifact, lookup), report))
        },
    )
    .await
    .map_err(|e| ServerError::Internal(e.to_string()))??;

    state.install(engine).await;
    info!(
        train_accuracy = report.train_accuracy,
        test_accuracy = report.test_accuracy,
        "model retrained and published"
    );

    Ok(Json(serde_json::json!({
        "success": true,
        "train_accuracy": report.train_accuracy,
        "test_accuracy": report.test_accuracy,
        "n_train": report.n_train,
        "n_test": report.n_test,
        "trained_at": report.trained_at.to_rfc3339(),
    })))
}

/// Metadata of the currently published model
pub async fn model_info(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>> {
    let engine = state
        .current()
        .await
        .ok_or_else(|| ServerError::NotFound("No model loaded".to_string()))?;

    let metadata = &engine.artifact().metadata;
    Ok(Json(serde_json::json!({
        "created_at": metadata.created_at.to_rfc3339(),
        "train_accuracy": metadata.train_accuracy,
        "test_accuracy": metadata.test_accuracy,
        "n_train": metadata.n_train,
        "n_test": metadata.n_test,
        "feature_names": metadata.feature_names,
        "known_passengers": engine.lookup().len(),
    })))
}

/// Liveness check
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let model_loaded = state.current().await.is_some();
    Json(serde_json::json!({
        "status": "ok",
        "model_loaded": model_loaded,
    }))
}
