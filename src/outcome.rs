pub const OUTCOME_LABELS: [&str; 3] = ["Home Win", "Draw", "Away Win"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl Outcome {
    /// Display order, independent of the classifier's class order.
    pub const ALL: [Outcome; 3] = [Outcome::HomeWin, Outcome::Draw, Outcome::AwayWin];

    pub fn label(self) -> &'static str {
        match self {
            Outcome::HomeWin => OUTCOME_LABELS[0],
            Outcome::Draw => OUTCOME_LABELS[1],
            Outcome::AwayWin => OUTCOME_LABELS[2],
        }
    }
}

/// Outcome probabilities in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeProbs {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

impl OutcomeProbs {
    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::HomeWin => self.home_win,
            Outcome::Draw => self.draw,
            Outcome::AwayWin => self.away_win,
        }
    }

    pub fn ordered(&self) -> [(Outcome, f64); 3] {
        Outcome::ALL.map(|o| (o, self.get(o)))
    }

    pub fn top(&self) -> f64 {
        self.home_win.max(self.draw).max(self.away_win)
    }

    pub fn total(&self) -> f64 {
        self.home_win + self.draw + self.away_win
    }
}
