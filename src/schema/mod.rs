//! Input schema: the canonical set of fields the service knows about
//!
//! The schema is the single source of truth for vector layout. Both fit and
//! transform walk its declared field order, so the output never depends on
//! incidental column ordering of whatever produced the records.

use serde::{Deserialize, Serialize};

/// Kind of an input field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Numeric,
    Categorical,
}

/// Strategy for imputing missing values of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace with the median (numeric only)
    Median,
    /// Replace with the most frequent value
    MostFrequent,
}

/// Strategy for encoding a field into the feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodeStrategy {
    /// Pass through as a single numeric column
    None,
    /// One-hot indicator block over the fitted vocabulary
    OneHot,
}

/// One input column with its handling rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub impute: ImputeStrategy,
    pub encode: EncodeStrategy,
}

impl Field {
    /// A numeric field: median-imputed, passed through as one column
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Numeric,
            impute: ImputeStrategy::Median,
            encode: EncodeStrategy::None,
        }
    }

    /// A categorical field: mode-imputed, one-hot encoded
    pub fn categorical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Categorical,
            impute: ImputeStrategy::MostFrequent,
            encode: EncodeStrategy::OneHot,
        }
    }
}

/// Ordered set of fields plus the label and identifier names.
///
/// Created once; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
    id_name: String,
    label_name: String,
}

impl Schema {
    pub fn new(
        fields: Vec<Field>,
        id_name: impl Into<String>,
        label_name: impl Into<String>,
    ) -> Self {
        Self {
            fields,
            id_name: id_name.into(),
            label_name: label_name.into(),
        }
    }

    /// The production schema for the Titanic passenger corpus
    pub fn titanic() -> Self {
        Self::new(
            vec![
                Field::categorical("Pclass"),
                Field::categorical("Sex"),
                Field::numeric("Age"),
                Field::numeric("SibSp"),
                Field::numeric("Parch"),
                Field::numeric("Fare"),
                Field::categorical("Embarked"),
            ],
            "PassengerId",
            "Survived",
        )
    }

    /// Fields in declared order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Name of the label column
    pub fn label_name(&self) -> &str {
        &self.label_name
    }

    /// Name of the identifier column
    pub fn id_name(&self) -> &str {
        &self.id_name
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titanic_schema_layout() {
        let schema = Schema::titanic();
        assert_eq!(schema.fields().len(), 7);
        assert_eq!(schema.label_name(), "Survived");
        assert_eq!(schema.id_name(), "PassengerId");

        let names: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Pclass", "Sex", "Age", "SibSp", "Parch", "Fare", "Embarked"]
        );
    }

    #[test]
    fn test_field_constructors_fix_strategies() {
        let age = Field::numeric("Age");
        assert_eq!(age.kind, FieldKind::Numeric);
        assert_eq!(age.impute, ImputeStrategy::Median);
        assert_eq!(age.encode, EncodeStrategy::None);

        let embarked = Field::categorical("Embarked");
        assert_eq!(embarked.kind, FieldKind::Categorical);
        assert_eq!(embarked.impute, ImputeStrategy::MostFrequent);
        assert_eq!(embarked.encode, EncodeStrategy::OneHot);
    }

    #[test]
    fn test_field_lookup() {
        let schema = Schema::titanic();
        assert!(schema.field("Fare").is_some());
        assert!(schema.field("Cabin").is_none());
    }
}
