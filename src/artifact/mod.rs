//! Model artifact: preprocessor and classifier bundled as one blob
//!
//! The two are serialized together so they can never be loaded out of sync:
//! a preprocessor fitted on one corpus never transforms for a classifier
//! fitted on another.

use crate::error::{LifeboatError, Result};
use crate::preprocessing::Preprocessor;
use crate::training::LogisticRegression;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Provenance and observability data carried alongside the fitted state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub created_at: DateTime<Utc>,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    pub n_train: usize,
    pub n_test: usize,
    pub feature_names: Vec<String>,
}

/// The persisted, versioned bundle of fitted preprocessing state and
/// classifier parameters. Created by the trainer; immutable; read by the
/// inference service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub preprocessor: Preprocessor,
    pub classifier: LogisticRegression,
    pub metadata: ArtifactMetadata,
}

impl ModelArtifact {
    /// Serialize the bundle to an opaque blob
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(Into::into)
    }

    /// Deserialize a bundle, rejecting blobs whose preprocessor was never
    /// fitted
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let artifact: Self = serde_json::from_slice(bytes)?;
        if !artifact.preprocessor.is_fitted() || !artifact.classifier.is_fitted() {
            return Err(LifeboatError::ModelNotFitted);
        }
        Ok(artifact)
    }
}

/// Opaque byte-store collaborator for artifact persistence
pub trait ArtifactStore: Send + Sync {
    fn store(&self, bytes: &[u8]) -> Result<()>;
    fn fetch(&self) -> Result<Vec<u8>>;
}

/// Artifact store backed by a local file
pub struct FsArtifactStore {
    path: PathBuf,
}

impl FsArtifactStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ArtifactStore for FsArtifactStore {
    fn store(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, bytes).map_err(LifeboatError::Io)
    }

    fn fetch(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path).map_err(LifeboatError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RawRecord, Scalar};
    use crate::schema::Schema;
    use crate::training::Trainer;

    fn trained_artifact() -> ModelArtifact {
        let corpus: Vec<RawRecord> = (0..10)
            .map(|i| {
                let mut r = RawRecord::new();
                r.insert("PassengerId", Scalar::Number(i as f64));
                r.insert("Pclass", Scalar::Number(1.0 + (i % 3) as f64));
                r.insert(
                    "Sex",
                    Scalar::Text(if i % 2 == 0 { "female" } else { "male" }.to_string()),
                );
                r.insert("Age", Scalar::Number(20.0 + i as f64));
                r.insert("SibSp", Scalar::Number(0.0));
                r.insert("Parch", Scalar::Number(0.0));
                r.insert("Fare", Scalar::Number(10.0 * (1 + i % 4) as f64));
                r.insert("Embarked", Scalar::Text("S".to_string()));
                r.insert("Survived", Scalar::Number((i % 2 == 0) as i64 as f64));
                r
            })
            .collect();
        let (artifact, _) = Trainer::default().run(&corpus, &Schema::titanic()).unwrap();
        artifact
    }

    #[test]
    fn test_bytes_roundtrip() {
        let artifact = trained_artifact();
        let bytes = artifact.to_bytes().unwrap();
        let restored = ModelArtifact::from_bytes(&bytes).unwrap();

        assert_eq!(
            artifact.preprocessor.feature_names(),
            restored.preprocessor.feature_names()
        );
        assert_eq!(
            artifact.metadata.train_accuracy,
            restored.metadata.train_accuracy
        );
    }

    #[test]
    fn test_fs_store_roundtrip() {
        let artifact = trained_artifact();
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path().join("model.json"));

        store.store(&artifact.to_bytes().unwrap()).unwrap();
        let restored = ModelArtifact::from_bytes(&store.fetch().unwrap()).unwrap();
        assert_eq!(artifact.metadata.n_train, restored.metadata.n_train);
    }

    #[test]
    fn test_fetch_missing_artifact_fails() {
        let store = FsArtifactStore::new("/nonexistent/model.json");
        assert!(store.fetch().is_err());
    }
}
