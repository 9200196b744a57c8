use crate::classifier::Classifier;
use crate::error::PredictError;
use crate::feature_schema::FeatureSchema;
use crate::outcome::{Outcome, OutcomeProbs};
use crate::resolver::PredictionRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchPrediction {
    pub home: String,
    pub away: String,
    /// Class name as the classifier reports it.
    pub label: String,
    pub probs: OutcomeProbs,
}

/// Runs the classifier on one merged record.
///
/// Probabilities are matched to outcomes by class name, so a model trained with a different
/// class order still renders as Home Win / Draw / Away Win.
pub fn predict_match<C: Classifier + ?Sized>(
    record: &PredictionRecord<'_>,
    classifier: &C,
    schema: &FeatureSchema,
) -> Result<MatchPrediction, PredictError> {
    let features = schema.assemble(record)?;
    let label = classifier.predict(&features)?;
    let proba = classifier.predict_proba(&features)?;

    let pct = |outcome: Outcome| -> Result<f64, PredictError> {
        let idx = classifier
            .classes()
            .iter()
            .position(|c| c == outcome.label())
            .ok_or_else(|| PredictError::UnknownLabel(outcome.label().to_string()))?;
        let p = proba
            .get(idx)
            .copied()
            .ok_or_else(|| PredictError::UnknownLabel(outcome.label().to_string()))?;
        Ok(p * 100.0)
    };

    let probs = OutcomeProbs {
        home_win: pct(Outcome::HomeWin)?,
        draw: pct(Outcome::Draw)?,
        away_win: pct(Outcome::AwayWin)?,
    };

    tracing::debug!(
        home = record.home(),
        away = record.away(),
        %label,
        home_win = probs.home_win,
        draw = probs.draw,
        away_win = probs.away_win,
        "prediction"
    );

    Ok(MatchPrediction {
        home: record.home().to_string(),
        away: record.away().to_string(),
        label,
        probs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ForestArtifact, RandomForest, TreeArtifact, TreeNode};
    use crate::resolver::resolve_latest_stats;
    use crate::stats_table::StatsTable;

    const TABLE: &str = "\
date,home,away,home_xg,away_xg
2024-08-17,Arsenal,Wolves,2.1,0.4
2024-08-24,Wolves,Chelsea,1.1,2.9
";

    fn forest(classes: [&str; 3], leaf: [f64; 3]) -> RandomForest {
        RandomForest::from_artifact(ForestArtifact {
            version: 1,
            generated_at: None,
            source: Some("test".into()),
            classes: classes.iter().map(|s| s.to_string()).collect(),
            feature_names: vec!["away_xg".into(), "home_xg".into()],
            trees: vec![TreeArtifact {
                nodes: vec![TreeNode::Leaf {
                    value: leaf.to_vec(),
                }],
            }],
        })
        .unwrap()
    }

    #[test]
    fn probabilities_follow_labels_not_positions() {
        let table = StatsTable::parse(TABLE).unwrap();
        let record = resolve_latest_stats(&table, "Arsenal", "Chelsea").unwrap();

        let a = forest(["Away Win", "Draw", "Home Win"], [2.0, 3.0, 5.0]);
        let b = forest(["Home Win", "Away Win", "Draw"], [5.0, 2.0, 3.0]);
        let schema_a = FeatureSchema::build(&table, &a).unwrap();
        let schema_b = FeatureSchema::build(&table, &b).unwrap();

        let pa = predict_match(&record, &a, &schema_a).unwrap();
        let pb = predict_match(&record, &b, &schema_b).unwrap();

        assert_eq!(pa.probs, pb.probs);
        assert!((pa.probs.home_win - 50.0).abs() < 1e-9);
        assert!((pa.probs.draw - 30.0).abs() < 1e-9);
        assert!((pa.probs.away_win - 20.0).abs() < 1e-9);
        assert_eq!(pa.label, "Home Win");
        assert_eq!(pb.label, "Home Win");
    }

    #[test]
    fn percentages_sum_to_hundred() {
        let table = StatsTable::parse(TABLE).unwrap();
        let record = resolve_latest_stats(&table, "Arsenal", "Chelsea").unwrap();
        let clf = forest(["Away Win", "Draw", "Home Win"], [1.0, 1.0, 1.0]);
        let schema = FeatureSchema::build(&table, &clf).unwrap();
        let p = predict_match(&record, &clf, &schema).unwrap();
        assert!((p.probs.total() - 100.0).abs() < 1e-9);
        assert_eq!(p.home, "Arsenal");
        assert_eq!(p.away, "Chelsea");
    }
}
