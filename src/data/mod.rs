//! Corpus ingestion and the raw value model
//!
//! CSV bytes come from a [`CorpusSource`] collaborator, are parsed with
//! polars, and converted into [`RawRecord`]s: plain field-name → scalar maps
//! with absent keys standing for missing values. Everything downstream
//! (preprocessing, lookup, inference) works on records, never on the
//! DataFrame, so vector layout is controlled by the schema alone.

use crate::error::{LifeboatError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// A raw field value as ingested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Numeric view of the value, if it has one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) if n.is_nan() => None,
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Categorical view of the value.
    ///
    /// Integral numbers collapse to their integer form ("3", not "3.0") so a
    /// category column read as numeric still matches its fitted vocabulary.
    pub fn as_category(&self) -> String {
        match self {
            Scalar::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            Scalar::Text(s) => s.trim().to_string(),
        }
    }
}

/// A single row: mapping from field name to a possibly-absent scalar.
///
/// Never mutated once read; an absent key is a missing value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    values: BTreeMap<String, Scalar>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Scalar) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.values.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Scalar> {
        self.values.remove(name)
    }

    /// Numeric value of a field, if present and parseable
    pub fn number(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(Scalar::as_number)
    }

    /// Categorical value of a field, if present
    pub fn category(&self, name: &str) -> Option<String> {
        self.values.get(name).map(Scalar::as_category)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Scalar)> {
        self.values.iter()
    }
}

/// Opaque "fetch bytes" collaborator for corpus retrieval
pub trait CorpusSource: Send + Sync {
    fn fetch(&self) -> Result<Vec<u8>>;
}

/// Corpus source backed by a local file
pub struct FsCorpusSource {
    path: PathBuf,
}

impl FsCorpusSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CorpusSource for FsCorpusSource {
    fn fetch(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path).map_err(LifeboatError::Io)
    }
}

/// Parse CSV bytes into a DataFrame
pub fn read_csv_bytes(bytes: &[u8]) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(Into::into)
}

/// Convert a DataFrame into raw records, one per row.
///
/// Nulls and NaNs become absent keys; integer-like columns stay numeric and
/// are collapsed to categories later only where the schema says so.
pub fn records_from_dataframe(df: &DataFrame) -> Result<Vec<RawRecord>> {
    let columns = df.get_columns();
    let names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let mut record = RawRecord::new();
        for (col, name) in columns.iter().zip(&names) {
            let value = match col.get(row) {
                Ok(AnyValue::Null) | Err(_) => None,
                Ok(AnyValue::Float64(v)) if v.is_nan() => None,
                Ok(AnyValue::Float64(v)) => Some(Scalar::Number(v)),
                Ok(AnyValue::Float32(v)) if v.is_nan() => None,
                Ok(AnyValue::Float32(v)) => Some(Scalar::Number(v as f64)),
                Ok(AnyValue::Int64(v)) => Some(Scalar::Number(v as f64)),
                Ok(AnyValue::Int32(v)) => Some(Scalar::Number(v as f64)),
                Ok(AnyValue::Int16(v)) => Some(Scalar::Number(v as f64)),
                Ok(AnyValue::Int8(v)) => Some(Scalar::Number(v as f64)),
                Ok(AnyValue::UInt64(v)) => Some(Scalar::Number(v as f64)),
                Ok(AnyValue::UInt32(v)) => Some(Scalar::Number(v as f64)),
                Ok(AnyValue::Boolean(b)) => Some(Scalar::Number(if b { 1.0 } else { 0.0 })),
                Ok(AnyValue::String(s)) => {
                    let trimmed = s.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        Some(Scalar::Text(trimmed.to_string()))
                    }
                }
                Ok(AnyValue::StringOwned(s)) => {
                    let trimmed = s.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        Some(Scalar::Text(trimmed.to_string()))
                    }
                }
                Ok(_) => None,
            };
            if let Some(v) = value {
                record.insert(name.clone(), v);
            }
        }
        records.push(record);
    }

    Ok(records)
}

/// Fetch and parse a full corpus from a source
pub fn load_corpus(source: &dyn CorpusSource) -> Result<Vec<RawRecord>> {
    let bytes = source.fetch()?;
    let df = read_csv_bytes(&bytes)?;
    records_from_dataframe(&df)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &[u8] = b"PassengerId,Pclass,Sex,Age,Fare,Embarked,Survived\n\
1,3,male,22,7.25,S,0\n\
2,1,female,38,71.2833,C,1\n\
3,3,female,,7.925,,1\n";

    #[test]
    fn test_read_csv_bytes() {
        let df = read_csv_bytes(SAMPLE_CSV).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 7);
    }

    #[test]
    fn test_records_missing_values_are_absent() {
        let df = read_csv_bytes(SAMPLE_CSV).unwrap();
        let records = records_from_dataframe(&df).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].number("Age"), Some(22.0));
        assert_eq!(records[2].get("Age"), None);
        assert_eq!(records[2].get("Embarked"), None);
        assert_eq!(records[2].category("Sex").as_deref(), Some("female"));
    }

    #[test]
    fn test_scalar_category_collapses_integers() {
        assert_eq!(Scalar::Number(3.0).as_category(), "3");
        assert_eq!(Scalar::Number(7.25).as_category(), "7.25");
        assert_eq!(Scalar::Text(" S ".to_string()).as_category(), "S");
    }

    #[test]
    fn test_scalar_number_parses_text() {
        assert_eq!(Scalar::Text("42".to_string()).as_number(), Some(42.0));
        assert_eq!(Scalar::Text("male".to_string()).as_number(), None);
        assert_eq!(Scalar::Number(f64::NAN).as_number(), None);
    }

    #[test]
    fn test_fs_source_missing_file() {
        let source = FsCorpusSource::new("/nonexistent/titanic.csv");
        assert!(matches!(source.fetch(), Err(LifeboatError::Io(_))));
    }
}
