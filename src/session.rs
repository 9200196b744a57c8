use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::classifier::{Classifier, load_classifier};
use crate::error::{PredictError, SchemaError};
use crate::feature_schema::FeatureSchema;
use crate::predictor::{MatchPrediction, predict_match};
use crate::resolver::resolve_latest_stats;
use crate::stats_table::StatsTable;

pub const DEFAULT_MODEL_PATH: &str = "assets/football_model_1_x_2.json";
pub const DEFAULT_STATS_PATH: &str = "assets/2024-2025-Premier-League_season_stats_1_x_2_rfc.csv";
pub const PLACEHOLDER_TEAM: &str = "Choose Your Team";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub model_path: PathBuf,
    pub stats_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            stats_path: PathBuf::from(DEFAULT_STATS_PATH),
        }
    }
}

impl SessionConfig {
    /// Fixed default paths, overridable by `MATCH_MODEL_PATH` / `MATCH_STATS_PATH`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            model_path: path_env("MATCH_MODEL_PATH").unwrap_or(defaults.model_path),
            stats_path: path_env("MATCH_STATS_PATH").unwrap_or(defaults.stats_path),
        }
    }
}

fn path_env(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// A team picker value: either the placeholder or a real team name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TeamChoice {
    #[default]
    Unselected,
    Team(String),
}

impl TeamChoice {
    pub fn from_input(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == PLACEHOLDER_TEAM {
            TeamChoice::Unselected
        } else {
            TeamChoice::Team(trimmed.to_string())
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            TeamChoice::Unselected => None,
            TeamChoice::Team(name) => Some(name.as_str()),
        }
    }

    pub fn display(&self) -> &str {
        self.name().unwrap_or(PLACEHOLDER_TEAM)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    /// A placeholder is still selected on at least one side.
    NotReady,
    SameTeam { team: String },
    MissingStats { home: String, away: String },
    Predicted(MatchPrediction),
}

impl PredictionOutcome {
    pub fn message(&self) -> String {
        match self {
            PredictionOutcome::NotReady => {
                "Please select different home and away teams and click Predict.".to_string()
            }
            PredictionOutcome::SameTeam { .. } => {
                "❌ Home and Away Teams are the same, not going to happen.".to_string()
            }
            PredictionOutcome::MissingStats { home, away } => {
                format!("❌ Missing stats for {home} or {away}.")
            }
            PredictionOutcome::Predicted(p) => format!(
                "Predicted Match Result for {} v {}: {}",
                p.home, p.away, p.label
            ),
        }
    }

    pub fn prediction(&self) -> Option<&MatchPrediction> {
        match self {
            PredictionOutcome::Predicted(p) => Some(p),
            _ => None,
        }
    }
}

/// Same-team guard shared by the request path and the live selector warning.
pub fn selection_conflict<'a>(home: &'a TeamChoice, away: &'a TeamChoice) -> Option<&'a str> {
    match (home.name(), away.name()) {
        (Some(h), Some(a)) if h == a => Some(h),
        _ => None,
    }
}

/// Startup state: loaded once, then only borrowed.
pub struct Session {
    table: StatsTable,
    classifier: Box<dyn Classifier>,
    schema: FeatureSchema,
    teams: Vec<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("rows", &self.table.len())
            .field("teams", &self.teams.len())
            .field("schema", &self.schema)
            .finish()
    }
}

impl Session {
    pub fn load(config: &SessionConfig) -> Result<Self> {
        let classifier = load_classifier(&config.model_path).with_context(|| {
            format!("load classifier {}", config.model_path.display())
        })?;
        let table = StatsTable::load(&config.stats_path)
            .with_context(|| format!("load stats table {}", config.stats_path.display()))?;
        info!(
            model = %config.model_path.display(),
            stats = %config.stats_path.display(),
            rows = table.len(),
            trees = classifier.tree_count(),
            model_source = classifier.source().unwrap_or("unknown"),
            "startup inputs loaded"
        );

        let session = Self::from_parts(table, Box::new(classifier))
            .context("feature schema mismatch between stats table and classifier")?;
        info!(
            teams = session.teams.len(),
            features = session.schema.len(),
            schema_version = session.schema.version(),
            "session ready"
        );
        Ok(session)
    }

    pub fn from_parts(
        table: StatsTable,
        classifier: Box<dyn Classifier>,
    ) -> Result<Self, SchemaError> {
        let schema = FeatureSchema::build(&table, classifier.as_ref())?;
        let teams = table.team_names();
        Ok(Self {
            table,
            classifier,
            schema,
            teams,
        })
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn table(&self) -> &StatsTable {
        &self.table
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// One predict press. Selection problems and missing stats are outcomes; only a
    /// model/feature mismatch is an error.
    pub fn request(
        &self,
        home: &TeamChoice,
        away: &TeamChoice,
    ) -> Result<PredictionOutcome, PredictError> {
        let (Some(home_team), Some(away_team)) = (home.name(), away.name()) else {
            return Ok(PredictionOutcome::NotReady);
        };
        if let Some(team) = selection_conflict(home, away) {
            return Ok(PredictionOutcome::SameTeam {
                team: team.to_string(),
            });
        }

        let Some(record) = resolve_latest_stats(&self.table, home_team, away_team) else {
            debug!(home = home_team, away = away_team, "no stats for selection");
            return Ok(PredictionOutcome::MissingStats {
                home: home_team.to_string(),
                away: away_team.to_string(),
            });
        };

        let prediction = predict_match(&record, self.classifier.as_ref(), &self.schema)?;
        Ok(PredictionOutcome::Predicted(prediction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_choice_treats_placeholder_as_unselected() {
        assert_eq!(TeamChoice::from_input(PLACEHOLDER_TEAM), TeamChoice::Unselected);
        assert_eq!(TeamChoice::from_input("  "), TeamChoice::Unselected);
        assert_eq!(
            TeamChoice::from_input(" Arsenal "),
            TeamChoice::Team("Arsenal".to_string())
        );
        assert_eq!(TeamChoice::Unselected.display(), PLACEHOLDER_TEAM);
    }

    #[test]
    fn conflict_needs_two_real_equal_teams() {
        let a = TeamChoice::Team("Arsenal".into());
        assert_eq!(selection_conflict(&a, &a), Some("Arsenal"));
        assert_eq!(
            selection_conflict(&TeamChoice::Unselected, &TeamChoice::Unselected),
            None
        );
        assert_eq!(
            selection_conflict(&a, &TeamChoice::Team("Chelsea".into())),
            None
        );
    }

    #[test]
    fn outcome_messages() {
        assert_eq!(
            PredictionOutcome::MissingStats {
                home: "Arsenal".into(),
                away: "Ipswich".into()
            }
            .message(),
            "❌ Missing stats for Arsenal or Ipswich."
        );
        assert!(PredictionOutcome::NotReady.message().starts_with("Please select"));
    }

    #[test]
    fn default_config_uses_fixed_paths() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(cfg.stats_path, PathBuf::from(DEFAULT_STATS_PATH));
    }
}
