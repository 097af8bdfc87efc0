//! Preprocessing pipeline: impute → scale → encode, in schema order

use crate::data::RawRecord;
use crate::error::{LifeboatError, Result};
use crate::schema::{EncodeStrategy, FieldKind, Schema};
use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::encoder::Encoder;
use super::imputer::Imputer;
use super::scaler::{Scaler, ScalerKind};

/// Configuration for the preprocessing pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Scaling applied to numeric fields
    pub scaler: ScalerKind,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            scaler: ScalerKind::Standard,
        }
    }
}

/// Fitted preprocessing pipeline.
///
/// `transform` is a pure function of the record and the fitted state: output
/// column count and order are fixed at fit time and never depend on what a
/// particular record happens to contain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    schema: Schema,
    config: PreprocessConfig,
    imputer: Imputer,
    scaler: Scaler,
    encoder: Encoder,
    feature_names: Vec<String>,
    is_fitted: bool,
}

impl Preprocessor {
    /// Create an unfitted preprocessor with the default configuration
    pub fn new(schema: Schema) -> Self {
        Self::with_config(schema, PreprocessConfig::default())
    }

    pub fn with_config(schema: Schema, config: PreprocessConfig) -> Self {
        Self {
            schema,
            config,
            imputer: Imputer::new(),
            scaler: Scaler::new(config.scaler),
            encoder: Encoder::new(),
            feature_names: Vec::new(),
            is_fitted: false,
        }
    }

    /// Fit per-field statistics from a training corpus
    pub fn fit(&mut self, records: &[RawRecord]) -> Result<&mut Self> {
        if records.is_empty() {
            return Err(LifeboatError::EmptyCorpus);
        }

        let mut imputer = Imputer::new();
        imputer.fit(records, &self.schema)?;

        let mut scaler = Scaler::new(self.config.scaler);
        scaler.fit(records, &self.schema, &imputer)?;

        let mut encoder = Encoder::new();
        encoder.fit(records, &self.schema, &imputer)?;

        self.feature_names = Self::build_feature_names(&self.schema, &encoder)?;
        self.imputer = imputer;
        self.scaler = scaler;
        self.encoder = encoder;
        self.is_fitted = true;
        Ok(self)
    }

    /// Transform records into the numeric feature matrix.
    ///
    /// Missing fields take the fitted fill value; unseen categories encode as
    /// the all-zero indicator block.
    pub fn transform(&self, records: &[RawRecord]) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(LifeboatError::ModelNotFitted);
        }

        let width = self.feature_names.len();
        let rows: Vec<Vec<f64>> = records
            .par_iter()
            .map(|record| self.encode_record(record))
            .collect::<Result<_>>()?;

        let mut flat = Vec::with_capacity(rows.len() * width);
        for row in &rows {
            flat.extend_from_slice(row);
        }
        Array2::from_shape_vec((records.len(), width), flat).map_err(Into::into)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, records: &[RawRecord]) -> Result<Array2<f64>> {
        self.fit(records)?;
        self.transform(records)
    }

    /// Names of the output columns, in order
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Number of output columns
    pub fn output_width(&self) -> usize {
        self.feature_names.len()
    }

    /// Position of an output column by name
    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.feature_names.iter().position(|n| n == name)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    fn encode_record(&self, record: &RawRecord) -> Result<Vec<f64>> {
        let mut row = Vec::with_capacity(self.feature_names.len());
        for field in self.schema.fields() {
            match field.kind {
                FieldKind::Numeric => {
                    let value = match record.number(&field.name) {
                        Some(v) => v,
                        None => self.imputer.number_fill(&field.name)?,
                    };
                    row.push(self.scaler.apply(&field.name, value)?);
                }
                FieldKind::Categorical => {
                    let category = match record.category(&field.name) {
                        Some(c) => c,
                        None => self.imputer.category_fill(&field.name)?.to_string(),
                    };
                    match field.encode {
                        EncodeStrategy::OneHot => {
                            self.encoder.encode_into(&field.name, &category, &mut row)?;
                        }
                        EncodeStrategy::None => {
                            row.push(category.parse::<f64>().unwrap_or(0.0));
                        }
                    }
                }
            }
        }
        Ok(row)
    }

    fn build_feature_names(schema: &Schema, encoder: &Encoder) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for field in schema.fields() {
            match (field.kind, field.encode) {
                (FieldKind::Categorical, EncodeStrategy::OneHot) => {
                    for value in encoder.vocabulary(&field.name)? {
                        names.push(format!("{}={}", field.name, value));
                    }
                }
                _ => names.push(field.name.clone()),
            }
        }
        Ok(names)
    }
}
