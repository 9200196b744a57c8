use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading the two startup inputs.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stats table is empty")]
    EmptyTable,

    #[error("stats table is missing required column `{0}`")]
    MissingColumn(String),

    #[error("stats table has duplicate column `{0}`")]
    DuplicateColumn(String),

    #[error("stats row {line}: expected {expected} cells, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("read stats table: {0}")]
    Csv(#[from] csv::Error),

    #[error("parse classifier artifact: {0}")]
    Artifact(#[from] serde_json::Error),

    #[error("invalid classifier artifact: {0}")]
    InvalidArtifact(String),
}

/// Feature schema does not line up between the stats table and the classifier.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("classifier expects features missing from the stats table: {}", .0.join(", "))]
    MissingFromTable(Vec<String>),

    #[error("stats table carries features the classifier does not know: {}", .0.join(", "))]
    UnknownToClassifier(Vec<String>),

    #[error("classifier feature `{0}` is a denylisted column")]
    DenylistedFeature(String),

    #[error("classifier has no `{0}` class")]
    MissingOutcomeClass(String),
}

/// Hard request-level failure. No partial result is shown.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("prediction record has no `{0}` column")]
    MissingFeature(String),

    #[error("feature `{column}` is not numeric: {value:?}")]
    NonNumericFeature { column: String, value: String },

    #[error("classifier expects {expected} features, got {got}")]
    FeatureCount { expected: usize, got: usize },

    #[error("classifier has no `{0}` class")]
    UnknownLabel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_columns() {
        let err = SchemaError::MissingFromTable(vec!["home_xg".into(), "away_xg".into()]);
        assert!(err.to_string().contains("home_xg, away_xg"));
    }

    #[test]
    fn predict_error_display() {
        let err = PredictError::NonNumericFeature {
            column: "home_xg".into(),
            value: "n/a".into(),
        };
        assert_eq!(err.to_string(), "feature `home_xg` is not numeric: \"n/a\"");
    }
}
