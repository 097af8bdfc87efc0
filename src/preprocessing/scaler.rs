//! Feature scaling for numeric fields

use crate::data::RawRecord;
use crate::error::{LifeboatError, Result};
use crate::schema::{FieldKind, Schema};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::imputer::Imputer;

/// Kind of scaling applied to numeric fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalerKind {
    /// Standard scaling (z-score): (x - mean) / std
    Standard,
    /// No scaling
    None,
}

/// Parameters for one fitted field
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScaleParams {
    center: f64,
    scale: f64,
}

/// Numeric field scaler.
///
/// Fitted over the imputed column: scaling never sees raw missing markers,
/// so the statistics match exactly what transform produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    kind: ScalerKind,
    params: HashMap<String, ScaleParams>,
}

impl Scaler {
    pub fn new(kind: ScalerKind) -> Self {
        Self {
            kind,
            params: HashMap::new(),
        }
    }

    /// Compute center/scale per numeric field over the imputed column
    pub fn fit(
        &mut self,
        records: &[RawRecord],
        schema: &Schema,
        imputer: &Imputer,
    ) -> Result<&mut Self> {
        if self.kind == ScalerKind::None {
            return Ok(self);
        }

        for field in schema.fields() {
            if field.kind != FieldKind::Numeric {
                continue;
            }
            let fill = imputer.number_fill(&field.name)?;
            let column: Vec<f64> = records
                .iter()
                .map(|r| r.number(&field.name).unwrap_or(fill))
                .collect();

            let n = column.len() as f64;
            let mean = column.iter().sum::<f64>() / n.max(1.0);
            let std = if column.len() < 2 {
                0.0
            } else {
                let ss: f64 = column.iter().map(|v| (v - mean).powi(2)).sum();
                (ss / (n - 1.0)).sqrt()
            };

            self.params.insert(
                field.name.clone(),
                ScaleParams {
                    center: mean,
                    scale: if std == 0.0 { 1.0 } else { std },
                },
            );
        }

        Ok(self)
    }

    /// Scale one value of a fitted field
    pub fn apply(&self, field: &str, value: f64) -> Result<f64> {
        match self.kind {
            ScalerKind::None => Ok(value),
            ScalerKind::Standard => self
                .params
                .get(field)
                .map(|p| (value - p.center) / p.scale)
                .ok_or_else(|| LifeboatError::UnknownField(field.to_string())),
        }
    }
}
