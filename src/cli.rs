//! Argument handling and text output for the one-shot `predict_match` binary.

use anyhow::{Result, bail};

use crate::chart::ProbabilityChart;
use crate::session::TeamChoice;

pub const USAGE: &str = "usage: predict_match --home <TEAM> --away <TEAM> | --list-teams";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ListTeams,
    Predict { home: TeamChoice, away: TeamChoice },
}

/// `args` excludes the program name. `--list-teams` wins over team flags.
pub fn parse_args(args: &[String]) -> Result<Command> {
    if args.iter().any(|a| a == "--list-teams") {
        return Ok(Command::ListTeams);
    }
    let home = parse_flag(args, "home");
    let away = parse_flag(args, "away");
    let (Some(home), Some(away)) = (home, away) else {
        bail!(USAGE);
    };
    Ok(Command::Predict {
        home: TeamChoice::from_input(&home),
        away: TeamChoice::from_input(&away),
    })
}

/// Value of `--name value` or `--name=value`; blank values count as absent.
pub fn parse_flag(args: &[String], name: &str) -> Option<String> {
    let long = format!("--{name}");
    let prefix = format!("--{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if *arg == long {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() && !next.starts_with("--") {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

/// Title plus one `label  pct  ####` line per outcome, two points per `#`.
pub fn render_table(chart: &ProbabilityChart) -> String {
    let mut out = chart.title.clone();
    for bar in &chart.bars {
        let width = (bar.pct / 2.0).round().max(0.0) as usize;
        out.push('\n');
        out.push_str(&format!("{:<9} {:>6}  {}", bar.label, bar.text, "#".repeat(width)));
    }
    out
}
