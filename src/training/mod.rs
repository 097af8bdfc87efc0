//! Model training
//!
//! Splits a labeled corpus with a seeded shuffle, fits the preprocessor and
//! classifier as one composed unit, and reports held-out accuracy. The
//! preprocessor never sees the test partition during fit.

mod engine;
mod logistic;

pub use engine::{Trainer, TrainerConfig, TrainingReport};
pub use logistic::LogisticRegression;
