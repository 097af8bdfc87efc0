//! Lifeboat - Titanic survival prediction service
//!
//! This crate trains a binary survival classifier over tabular passenger
//! attributes, persists the fitted model as a single artifact, and serves
//! predictions keyed by passenger identifier. The preprocessing applied at
//! training time is reproduced exactly at serving time: one fitted state,
//! one transform, for both paths.
//!
//! # Modules
//!
//! ## Core
//! - [`schema`] - Canonical field set, label and identifier names
//! - [`preprocessing`] - Imputation, scaling, one-hot encoding
//! - [`training`] - Seeded split, logistic regression, trainer
//! - [`artifact`] - Preprocessor + classifier bundled in one blob
//! - [`lookup`] - Identifier-keyed in-memory record index
//! - [`inference`] - Lookup → transform → verdict
//!
//! ## Data
//! - [`data`] - Corpus ingestion, scalar value model
//!
//! ## Services
//! - [`server`] - HTTP server with REST API
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Core modules
pub mod schema;
pub mod preprocessing;
pub mod training;
pub mod artifact;
pub mod lookup;
pub mod inference;

// Data ingestion
pub mod data;

// Services
pub mod server;
pub mod cli;

pub use error::{LifeboatError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{LifeboatError, Result};

    // Schema
    pub use crate::schema::{EncodeStrategy, Field, FieldKind, ImputeStrategy, Schema};

    // Data model
    pub use crate::data::{CorpusSource, FsCorpusSource, RawRecord, Scalar};

    // Preprocessing
    pub use crate::preprocessing::{PreprocessConfig, Preprocessor, ScalerKind};

    // Training
    pub use crate::training::{LogisticRegression, Trainer, TrainerConfig, TrainingReport};

    // Artifact
    pub use crate::artifact::{ArtifactStore, FsArtifactStore, ModelArtifact};

    // Lookup
    pub use crate::lookup::LookupStore;

    // Inference
    pub use crate::inference::{InferenceEngine, SurvivalStatus, Verdict};
}
