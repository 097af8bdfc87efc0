//! Training engine: split, fit, score, bundle

use crate::artifact::{ArtifactMetadata, ModelArtifact};
use crate::data::RawRecord;
use crate::error::{LifeboatError, Result};
use crate::preprocessing::{PreprocessConfig, Preprocessor};
use crate::schema::Schema;
use chrono::{DateTime, Utc};
use ndarray::Array1;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::logistic::LogisticRegression;

/// Training configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Fraction of labeled rows held out for testing
    pub test_fraction: f64,
    /// Seed for the shuffle split
    pub seed: u64,
    /// Maximum classifier iterations
    pub max_iter: usize,
    /// Classifier step size
    pub learning_rate: f64,
    /// Classifier L2 penalty
    pub l2: f64,
    /// Preprocessing configuration
    pub preprocess: PreprocessConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.3,
            seed: 42,
            max_iter: 1000,
            learning_rate: 0.1,
            l2: 0.01,
            preprocess: PreprocessConfig::default(),
        }
    }
}

/// Accuracy and partition sizes of a completed training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    pub n_train: usize,
    pub n_test: usize,
    pub trained_at: DateTime<Utc>,
}

/// Trainer: fits preprocessor and classifier as one composed unit.
///
/// The preprocessor is fitted on the train partition only; both partitions
/// are scored through that same fitted state.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// Run a full training pass over the corpus.
    ///
    /// Rows without a parseable label are dropped before the split; labels
    /// are never imputed.
    pub fn run(
        &self,
        corpus: &[RawRecord],
        schema: &Schema,
    ) -> Result<(ModelArtifact, TrainingReport)> {
        let labeled: Vec<&RawRecord> = corpus
            .iter()
            .filter(|r| r.number(schema.label_name()).is_some())
            .collect();
        if labeled.is_empty() {
            return Err(LifeboatError::InsufficientLabels);
        }

        let dropped = corpus.len() - labeled.len();
        if dropped > 0 {
            info!(dropped, "dropped rows with missing label");
        }

        let (train, test) = self.split(&labeled);

        let mut preprocessor =
            Preprocessor::with_config(schema.clone(), self.config.preprocess);
        preprocessor.fit(&train)?;

        let x_train = preprocessor.transform(&train)?;
        let y_train = Self::labels(&train, schema);

        let mut classifier = LogisticRegression::new()
            .with_max_iter(self.config.max_iter)
            .with_learning_rate(self.config.learning_rate)
            .with_l2(self.config.l2);
        classifier.fit(&x_train, &y_train)?;

        let train_accuracy = classifier.score(&x_train, &y_train)?;
        let test_accuracy = if test.is_empty() {
            train_accuracy
        } else {
            let x_test = preprocessor.transform(&test)?;
            let y_test = Self::labels(&test, schema);
            classifier.score(&x_test, &y_test)?
        };

        let report = TrainingReport {
            train_accuracy,
            test_accuracy,
            n_train: train.len(),
            n_test: test.len(),
            trained_at: Utc::now(),
        };
        info!(
            train_accuracy,
            test_accuracy,
            n_train = report.n_train,
            n_test = report.n_test,
            "training complete"
        );

        let metadata = ArtifactMetadata {
            created_at: report.trained_at,
            train_accuracy,
            test_accuracy,
            n_train: report.n_train,
            n_test: report.n_test,
            feature_names: preprocessor.feature_names().to_vec(),
        };
        let artifact = ModelArtifact {
            preprocessor,
            classifier,
            metadata,
        };

        Ok((artifact, report))
    }

    /// Seeded shuffle split into (train, test). At least one row always
    /// stays in the train partition.
    fn split(&self, labeled: &[&RawRecord]) -> (Vec<RawRecord>, Vec<RawRecord>) {
        let n = labeled.len();
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        indices.shuffle(&mut rng);

        let mut n_test = (n as f64 * self.config.test_fraction).round() as usize;
        if n_test >= n {
            n_test = n - 1;
        }

        let (test_idx, train_idx) = indices.split_at(n_test);
        let train = train_idx.iter().map(|&i| labeled[i].clone()).collect();
        let test = test_idx.iter().map(|&i| labeled[i].clone()).collect();
        (train, test)
    }

    fn labels(records: &[RawRecord], schema: &Schema) -> Array1<f64> {
        records
            .iter()
            .map(|r| r.number(schema.label_name()).unwrap_or(0.0))
            .collect()
    }
}
