use std::collections::HashSet;

use crate::classifier::Classifier;
use crate::error::{PredictError, SchemaError};
use crate::outcome::OUTCOME_LABELS;
use crate::resolver::PredictionRecord;
use crate::stats_table::StatsTable;

pub const FEATURE_SCHEMA_VERSION: u32 = 1;

/// Columns that never reach the classifier: targets, identifiers and raw kickoff fields.
pub const FEATURE_DENYLIST: [&str; 14] = [
    "home_gls_srd",
    "away_gls_srd",
    "match_result",
    "date",
    "wk",
    "day",
    "day_id",
    "target_ttl_gls_srd",
    "away",
    "away_gls_cnd",
    "home",
    "home_gls_cnd",
    "time",
    "time_id",
];

pub fn is_denylisted(column: &str) -> bool {
    FEATURE_DENYLIST.contains(&column)
}

/// Named feature set, in the order the classifier consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    version: u32,
    features: Vec<String>,
}

impl FeatureSchema {
    /// Checks the stats table and the classifier agree on the feature set.
    ///
    /// The table's non-denylisted columns must be exactly the classifier's inputs (as a set),
    /// and the classifier must know every outcome label.
    pub fn build<C: Classifier + ?Sized>(
        table: &StatsTable,
        classifier: &C,
    ) -> Result<Self, SchemaError> {
        let expected = classifier.feature_names();
        if let Some(bad) = expected.iter().find(|f| is_denylisted(f)) {
            return Err(SchemaError::DenylistedFeature(bad.clone()));
        }

        let table_features = table
            .columns()
            .iter()
            .filter(|c| !is_denylisted(c))
            .map(String::as_str)
            .collect::<HashSet<_>>();
        let expected_set = expected.iter().map(String::as_str).collect::<HashSet<_>>();

        let missing = expected
            .iter()
            .filter(|f| !table_features.contains(f.as_str()))
            .cloned()
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(SchemaError::MissingFromTable(missing));
        }

        let unknown = table
            .columns()
            .iter()
            .filter(|c| !is_denylisted(c) && !expected_set.contains(c.as_str()))
            .cloned()
            .collect::<Vec<_>>();
        if !unknown.is_empty() {
            return Err(SchemaError::UnknownToClassifier(unknown));
        }

        for label in OUTCOME_LABELS {
            if !classifier.classes().iter().any(|c| c == label) {
                return Err(SchemaError::MissingOutcomeClass(label.to_string()));
            }
        }

        Ok(Self {
            version: FEATURE_SCHEMA_VERSION,
            features: expected.to_vec(),
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature vector for one record, looked up by column name.
    pub fn assemble(&self, record: &PredictionRecord<'_>) -> Result<Vec<f64>, PredictError> {
        self.features
            .iter()
            .map(|name| {
                let raw = record
                    .get(name)
                    .ok_or_else(|| PredictError::MissingFeature(name.clone()))?;
                parse_feature(raw).ok_or_else(|| PredictError::NonNumericFeature {
                    column: name.clone(),
                    value: raw.to_string(),
                })
            })
            .collect()
    }
}

fn parse_feature(raw: &str) -> Option<f64> {
    let s = raw.trim();
    match s {
        "" => None,
        "True" | "true" => Some(1.0),
        "False" | "false" => Some(0.0),
        _ => s.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}
