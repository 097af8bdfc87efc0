//! Feature preprocessing
//!
//! Fits per-field imputation, scaling, and encoding statistics from a
//! training corpus and exposes a deterministic transform usable on any
//! subset of rows sharing the schema. The fitted state fully determines the
//! output layout, which is what keeps the training-time and serving-time
//! transforms identical.

mod encoder;
mod imputer;
mod pipeline;
mod scaler;

pub use encoder::Encoder;
pub use imputer::{FillValue, Imputer};
pub use pipeline::{PreprocessConfig, Preprocessor};
pub use scaler::{Scaler, ScalerKind};
