use std::collections::VecDeque;

use crate::chart::ProbabilityChart;
use crate::error::PredictError;
use crate::session::{PLACEHOLDER_TEAM, PredictionOutcome, Session, TeamChoice, selection_conflict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Home,
    Away,
}

/// Dropdown stand-in: the placeholder followed by every known team.
#[derive(Debug, Clone)]
pub struct TeamPicker {
    options: Vec<String>,
    selected: usize,
}

impl TeamPicker {
    pub fn new(teams: &[String]) -> Self {
        let mut options = Vec::with_capacity(teams.len() + 1);
        options.push(PLACEHOLDER_TEAM.to_string());
        options.extend(teams.iter().cloned());
        Self {
            options,
            selected: 0,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn choice(&self) -> TeamChoice {
        if self.selected == 0 {
            return TeamChoice::Unselected;
        }
        self.options
            .get(self.selected)
            .map(|name| TeamChoice::Team(name.clone()))
            .unwrap_or_default()
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.options.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.options.len().saturating_sub(1);
    }

    /// Jump to `name`; false when the team is unknown.
    pub fn select_team(&mut self, name: &str) -> bool {
        match self.options.iter().skip(1).position(|t| t == name) {
            Some(pos) => {
                self.selected = pos + 1;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub home: TeamPicker,
    pub away: TeamPicker,
    pub focus: Focus,
    pub outcome: Option<PredictionOutcome>,
    pub failure: Option<String>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(teams: &[String]) -> Self {
        Self {
            home: TeamPicker::new(teams),
            away: TeamPicker::new(teams),
            focus: Focus::Home,
            outcome: None,
            failure: None,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn focused_picker(&self) -> &TeamPicker {
        match self.focus {
            Focus::Home => &self.home,
            Focus::Away => &self.away,
        }
    }

    fn focused_picker_mut(&mut self) -> &mut TeamPicker {
        match self.focus {
            Focus::Home => &mut self.home,
            Focus::Away => &mut self.away,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Home => Focus::Away,
            Focus::Away => Focus::Home,
        };
    }

    pub fn select_next(&mut self) {
        self.focused_picker_mut().select_next();
        self.clear_result();
    }

    pub fn select_prev(&mut self) {
        self.focused_picker_mut().select_prev();
        self.clear_result();
    }

    pub fn select_first(&mut self) {
        self.focused_picker_mut().select_first();
        self.clear_result();
    }

    pub fn select_last(&mut self) {
        self.focused_picker_mut().select_last();
        self.clear_result();
    }

    /// A changed selection invalidates the last prediction.
    fn clear_result(&mut self) {
        self.outcome = None;
        self.failure = None;
    }

    /// Shown as soon as both pickers hold the same team, before any predict press.
    pub fn selection_warning(&self) -> Option<String> {
        let home = self.home.choice();
        let away = self.away.choice();
        selection_conflict(&home, &away).map(|team| {
            PredictionOutcome::SameTeam {
                team: team.to_string(),
            }
            .message()
        })
    }

    pub fn predict(&mut self, session: &Session) {
        let home = self.home.choice();
        let away = self.away.choice();
        let result = session.request(&home, &away);
        self.apply_result(result);
    }

    pub fn apply_result(&mut self, result: Result<PredictionOutcome, PredictError>) {
        match result {
            Ok(outcome) => {
                let line = match &outcome {
                    PredictionOutcome::Predicted(p) => format!(
                        "[INFO] {} v {}: {} (H {:.1} D {:.1} A {:.1})",
                        p.home, p.away, p.label, p.probs.home_win, p.probs.draw, p.probs.away_win
                    ),
                    PredictionOutcome::MissingStats { home, away } => {
                        format!("[WARN] No stats for {home} or {away}")
                    }
                    PredictionOutcome::SameTeam { team } => {
                        format!("[WARN] {team} selected on both sides")
                    }
                    PredictionOutcome::NotReady => "[INFO] Pick both teams first".to_string(),
                };
                self.push_log(line);
                self.failure = None;
                self.outcome = Some(outcome);
            }
            Err(err) => {
                tracing::error!(error = %err, "prediction failed");
                self.push_log(format!("[ERROR] {err}"));
                self.outcome = None;
                self.failure = Some(format!("❌ Prediction failed: {err}"));
            }
        }
    }

    pub fn result_text(&self) -> String {
        if let Some(failure) = &self.failure {
            return failure.clone();
        }
        self.outcome
            .as_ref()
            .unwrap_or(&PredictionOutcome::NotReady)
            .message()
    }

    pub fn chart(&self) -> Option<ProbabilityChart> {
        self.outcome
            .as_ref()
            .and_then(PredictionOutcome::prediction)
            .map(ProbabilityChart::from_prediction)
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teams() -> Vec<String> {
        vec!["Arsenal".into(), "Chelsea".into(), "Everton".into()]
    }

    #[test]
    fn picker_starts_on_placeholder() {
        let picker = TeamPicker::new(&teams());
        assert_eq!(picker.options()[0], PLACEHOLDER_TEAM);
        assert_eq!(picker.choice(), TeamChoice::Unselected);
    }

    #[test]
    fn picker_clamps_at_both_ends() {
        let mut picker = TeamPicker::new(&teams());
        picker.select_prev();
        assert_eq!(picker.selected(), 0);
        picker.select_last();
        picker.select_next();
        assert_eq!(picker.choice(), TeamChoice::Team("Everton".into()));
    }

    #[test]
    fn select_team_skips_placeholder() {
        let mut picker = TeamPicker::new(&teams());
        assert!(picker.select_team("Chelsea"));
        assert_eq!(picker.selected(), 2);
        assert!(!picker.select_team(PLACEHOLDER_TEAM));
        assert!(!picker.select_team("Leeds"));
    }

    #[test]
    fn same_team_warning_shows_before_predict() {
        let mut state = AppState::new(&teams());
        assert!(state.selection_warning().is_none());
        state.home.select_team("Arsenal");
        state.away.select_team("Arsenal");
        assert!(state.selection_warning().unwrap().contains("the same"));
    }

    #[test]
    fn moving_selection_clears_previous_result() {
        let mut state = AppState::new(&teams());
        state.apply_result(Ok(PredictionOutcome::MissingStats {
            home: "Arsenal".into(),
            away: "Chelsea".into(),
        }));
        assert!(state.result_text().contains("Missing stats"));
        state.toggle_focus();
        state.select_next();
        assert!(state.outcome.is_none());
        assert!(state.result_text().starts_with("Please select"));
    }

    #[test]
    fn hard_failure_replaces_result_and_logs() {
        let mut state = AppState::new(&teams());
        state.apply_result(Err(PredictError::MissingFeature("home_xg".into())));
        assert!(state.chart().is_none());
        assert!(state.result_text().starts_with("❌ Prediction failed"));
        assert!(state.logs.back().unwrap().starts_with("[ERROR]"));
    }

    #[test]
    fn push_log_is_bounded() {
        let mut state = AppState::new(&teams());
        for i in 0..250 {
            state.push_log(format!("line {i}"));
        }
        assert_eq!(state.logs.len(), 200);
        assert_eq!(state.logs.front().unwrap(), "line 50");
    }
}
