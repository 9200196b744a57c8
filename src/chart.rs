use crate::outcome::OutcomeProbs;
use crate::predictor::MatchPrediction;

/// Bars carry tenths of a percent so one decimal survives the integer bar widget.
pub const VALUE_SCALE: f64 = 10.0;
pub const HEADROOM_PCT: f64 = 10.0;
pub const BAR_WIDTH: u16 = 10;
pub const BAR_GAP: u16 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: &'static str,
    pub pct: f64,
    pub value: u64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityChart {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub bars: Vec<ChartBar>,
    /// Y-axis ceiling in bar units: top bar plus ten points.
    pub max: u64,
}

impl ProbabilityChart {
    pub fn from_prediction(prediction: &MatchPrediction) -> Self {
        Self::new(&prediction.home, &prediction.away, &prediction.probs)
    }

    pub fn new(home: &str, away: &str, probs: &OutcomeProbs) -> Self {
        let bars = probs
            .ordered()
            .into_iter()
            .map(|(outcome, pct)| ChartBar {
                label: outcome.label(),
                pct,
                value: to_units(pct),
                text: format_pct(pct),
            })
            .collect();
        Self {
            title: format!("{home} vs {away} - Result Probabilities"),
            x_label: "Match Result",
            y_label: "Probability (%)",
            bars,
            max: to_units(probs.top() + HEADROOM_PCT),
        }
    }

    /// Percentage text for every bar, column-aligned with a `BAR_WIDTH`/`BAR_GAP` bar chart.
    /// The bar widget prints no value text on a zero-height bar, so the labels live here.
    pub fn value_row(&self) -> String {
        let width = usize::from(BAR_WIDTH);
        let gap = " ".repeat(usize::from(BAR_GAP));
        self.bars
            .iter()
            .map(|bar| format!("{:^width$}", bar.text))
            .collect::<Vec<_>>()
            .join(&gap)
    }
}

pub fn format_pct(pct: f64) -> String {
    format!("{pct:.1}%")
}

fn to_units(pct: f64) -> u64 {
    (pct.max(0.0) * VALUE_SCALE).round() as u64
}
