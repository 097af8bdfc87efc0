//! Identifier-keyed passenger record index
//!
//! Built once from the corpus; read-only afterwards. Refreshing replaces the
//! whole index by snapshot swap in the server state, so readers never see a
//! partially-rebuilt index.

use crate::data::RawRecord;
use crate::error::{LifeboatError, Result};
use crate::schema::Schema;
use std::collections::HashMap;
use tracing::warn;

/// Canonical string form of a passenger identifier.
///
/// "42", 42, and "42.0" all normalize to "42" so string and integer request
/// forms compare equal.
pub fn normalize_id(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(integer) = trimmed.parse::<i64>() {
        return integer.to_string();
    }
    if let Ok(float) = trimmed.parse::<f64>() {
        if float.is_finite() && float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
            return (float as i64).to_string();
        }
    }
    trimmed.to_string()
}

/// In-memory index of known passenger records by normalized identifier
#[derive(Debug, Clone, Default)]
pub struct LookupStore {
    index: HashMap<String, RawRecord>,
}

impl LookupStore {
    /// Build the index from a corpus.
    ///
    /// Label and identifier fields are stripped from stored records. On
    /// duplicate identifiers the last-seen record wins. Rows without an
    /// identifier cannot be indexed and are skipped.
    pub fn build(records: &[RawRecord], schema: &Schema) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        let mut skipped = 0usize;

        for record in records {
            let Some(id) = record.get(schema.id_name()) else {
                skipped += 1;
                continue;
            };
            let key = normalize_id(&id.as_category());
            let mut stored = record.clone();
            stored.remove(schema.id_name());
            stored.remove(schema.label_name());
            index.insert(key, stored);
        }

        if skipped > 0 {
            warn!(skipped, "corpus rows without an identifier were not indexed");
        }
        Self { index }
    }

    /// Resolve an identifier to its record
    pub fn resolve(&self, raw_id: &str) -> Result<&RawRecord> {
        self.index
            .get(&normalize_id(raw_id))
            .ok_or_else(|| LifeboatError::NotFound(raw_id.trim().to_string()))
    }

    pub fn contains(&self, raw_id: &str) -> bool {
        self.index.contains_key(&normalize_id(raw_id))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
