//! Inference service: identifier in, verdict out
//!
//! Resolves the record, transforms the single-record batch through the
//! artifact's fitted preprocessor, and reads class and probability off the
//! identical transformed matrix so the reported confidence always belongs to
//! the reported class.

use crate::artifact::ModelArtifact;
use crate::data::RawRecord;
use crate::error::{LifeboatError, Result};
use crate::lookup::{normalize_id, LookupStore};
use serde::Serialize;
use std::sync::Arc;

/// Predicted survival class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SurvivalStatus {
    #[serde(rename = "Survived")]
    Survived,
    #[serde(rename = "Not Survived")]
    NotSurvived,
}

/// One prediction result
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub passenger_id: String,
    pub survival_status: SurvivalStatus,
    pub confidence: f64,
    pub features: RawRecord,
}

/// Decimal places kept when presenting confidence
const CONFIDENCE_PRECISION: f64 = 1e4;

/// Inference engine over one consistent artifact + lookup snapshot.
///
/// Both halves are read-only and Arc-shared, so the engine can be invoked
/// concurrently; refreshing the model means building a new engine and
/// swapping the reference.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    artifact: Arc<ModelArtifact>,
    lookup: Arc<LookupStore>,
}

impl InferenceEngine {
    pub fn new(artifact: ModelArtifact, lookup: LookupStore) -> Self {
        Self {
            artifact: Arc::new(artifact),
            lookup: Arc::new(lookup),
        }
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn lookup(&self) -> &LookupStore {
        &self.lookup
    }

    /// Predict survival for a passenger identifier.
    ///
    /// A missing identifier propagates as `NotFound`; classifier failures
    /// are wrapped in `Inference` and never escape raw.
    pub fn predict(&self, raw_id: &str) -> Result<Verdict> {
        let record = self.lookup.resolve(raw_id)?;

        let features = self
            .artifact
            .preprocessor
            .transform(std::slice::from_ref(record))?;

        let class = self
            .artifact
            .classifier
            .predict(&features)
            .map_err(|e| LifeboatError::Inference(e.to_string()))?;
        let proba = self
            .artifact
            .classifier
            .predict_proba(&features)
            .map_err(|e| LifeboatError::Inference(e.to_string()))?;

        let survived = class[0] >= 0.5;
        let confidence = if survived { proba[0] } else { 1.0 - proba[0] };
        let confidence = (confidence * CONFIDENCE_PRECISION).round() / CONFIDENCE_PRECISION;

        Ok(Verdict {
            passenger_id: normalize_id(raw_id),
            survival_status: if survived {
                SurvivalStatus::Survived
            } else {
                SurvivalStatus::NotSurvived
            },
            confidence,
            features: record.clone(),
        })
    }
}
