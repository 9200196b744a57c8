//! Football match result predictor.
//!
//! Loads a season statistics table and a pre-trained random-forest classifier once at
//! startup, merges the latest home-side and away-side stats for a chosen pair of teams into
//! one feature record, and reports the classifier's predicted result with per-outcome
//! probabilities.
//!
//! ```no_run
//! use match_result_terminal::session::{Session, SessionConfig, TeamChoice};
//!
//! let session = Session::load(&SessionConfig::from_env())?;
//! let outcome = session.request(
//!     &TeamChoice::Team("Arsenal".into()),
//!     &TeamChoice::Team("Chelsea".into()),
//! )?;
//! println!("{}", outcome.message());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod chart;
pub mod classifier;
pub mod cli;
pub mod error;
pub mod feature_schema;
pub mod logging;
pub mod outcome;
pub mod predictor;
pub mod resolver;
pub mod session;
pub mod state;
pub mod stats_table;

pub use classifier::{Classifier, RandomForest};
pub use outcome::{Outcome, OutcomeProbs};
pub use predictor::MatchPrediction;
pub use session::{PredictionOutcome, Session, SessionConfig, TeamChoice};
pub use stats_table::StatsTable;
