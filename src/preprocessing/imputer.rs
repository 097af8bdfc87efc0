//! Missing value imputation

use crate::data::RawRecord;
use crate::error::{LifeboatError, Result};
use crate::schema::{FieldKind, ImputeStrategy, Schema};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A learned fill value for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FillValue {
    Number(f64),
    Category(String),
}

/// Per-field imputation state, learned at fit time from non-missing values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Imputer {
    fills: HashMap<String, FillValue>,
}

impl Imputer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn fill values for every schema field over the given records
    pub fn fit(&mut self, records: &[RawRecord], schema: &Schema) -> Result<&mut Self> {
        for field in schema.fields() {
            let fill = match field.impute {
                ImputeStrategy::Median => {
                    if field.kind != FieldKind::Numeric {
                        return Err(LifeboatError::Data(format!(
                            "median imputation requires a numeric field: {}",
                            field.name
                        )));
                    }
                    let mut values: Vec<f64> = records
                        .iter()
                        .filter_map(|r| r.number(&field.name))
                        .collect();
                    FillValue::Number(median(&mut values))
                }
                ImputeStrategy::MostFrequent => match field.kind {
                    FieldKind::Numeric => {
                        let values: Vec<f64> = records
                            .iter()
                            .filter_map(|r| r.number(&field.name))
                            .collect();
                        FillValue::Number(most_frequent_number(&values))
                    }
                    FieldKind::Categorical => {
                        let values: Vec<String> = records
                            .iter()
                            .filter_map(|r| r.category(&field.name))
                            .collect();
                        FillValue::Category(most_frequent(&values))
                    }
                },
            };
            self.fills.insert(field.name.clone(), fill);
        }
        Ok(self)
    }

    /// Numeric fill value for a field
    pub fn number_fill(&self, field: &str) -> Result<f64> {
        match self.fills.get(field) {
            Some(FillValue::Number(v)) => Ok(*v),
            _ => Err(LifeboatError::UnknownField(field.to_string())),
        }
    }

    /// Categorical fill value for a field
    pub fn category_fill(&self, field: &str) -> Result<&str> {
        match self.fills.get(field) {
            Some(FillValue::Category(v)) => Ok(v),
            _ => Err(LifeboatError::UnknownField(field.to_string())),
        }
    }
}

/// Median of the non-missing values; midpoint of the two central values for
/// even counts. Empty input yields 0.0.
fn median(values: &mut Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

/// Most frequent value; ties break toward the first-seen value so the result
/// is deterministic for a given record order.
fn most_frequent(values: &[String]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for v in values {
        match counts.iter_mut().find(|entry| entry.0 == v.as_str()) {
            Some(entry) => entry.1 += 1,
            None => counts.push((v.as_str(), 1)),
        }
    }
    let mut best: Option<(&str, usize)> = None;
    for &(value, count) in &counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((value, count)),
        }
    }
    best.map(|(v, _)| v.to_string()).unwrap_or_default()
}

fn most_frequent_number(values: &[f64]) -> f64 {
    let mut counts: Vec<(u64, usize)> = Vec::new();
    for v in values {
        let bits = v.to_bits();
        match counts.iter_mut().find(|entry| entry.0 == bits) {
            Some(entry) => entry.1 += 1,
            None => counts.push((bits, 1)),
        }
    }
    let mut best: Option<(u64, usize)> = None;
    for &(bits, count) in &counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((bits, count)),
        }
    }
    best.map(|(bits, _)| f64::from_bits(bits)).unwrap_or(0.0)
}
