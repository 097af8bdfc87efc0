//! One-hot encoding over a vocabulary closed at fit time

use crate::data::RawRecord;
use crate::error::{LifeboatError, Result};
use crate::schema::{EncodeStrategy, Schema};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::imputer::Imputer;

/// Categorical encoder.
///
/// The vocabulary per field is fixed in first-seen order when fitted. A
/// category outside the vocabulary encodes as the all-zero indicator block:
/// output width never changes after fit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Encoder {
    vocabularies: HashMap<String, Vec<String>>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the distinct values of every one-hot field over the imputed
    /// column, preserving first-seen order
    pub fn fit(
        &mut self,
        records: &[RawRecord],
        schema: &Schema,
        imputer: &Imputer,
    ) -> Result<&mut Self> {
        for field in schema.fields() {
            if field.encode != EncodeStrategy::OneHot {
                continue;
            }
            let fill = imputer.category_fill(&field.name)?.to_string();
            let mut vocabulary: Vec<String> = Vec::new();
            for record in records {
                let category = record
                    .category(&field.name)
                    .unwrap_or_else(|| fill.clone());
                if !vocabulary.contains(&category) {
                    vocabulary.push(category);
                }
            }
            self.vocabularies.insert(field.name.clone(), vocabulary);
        }
        Ok(self)
    }

    /// Fitted vocabulary of a field
    pub fn vocabulary(&self, field: &str) -> Result<&[String]> {
        self.vocabularies
            .get(field)
            .map(Vec::as_slice)
            .ok_or_else(|| LifeboatError::UnknownField(field.to_string()))
    }

    /// Width of the indicator block a field contributes
    pub fn width(&self, field: &str) -> Result<usize> {
        self.vocabulary(field).map(<[String]>::len)
    }

    /// Append the indicator block for one value to an output row
    pub fn encode_into(&self, field: &str, category: &str, out: &mut Vec<f64>) -> Result<()> {
        for known in self.vocabulary(field)? {
            out.push(if known == category { 1.0 } else { 0.0 });
        }
        Ok(())
    }
}
