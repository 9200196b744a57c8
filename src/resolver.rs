use crate::stats_table::{AWAY_COLUMN, AWAY_PREFIX, HOME_COLUMN, StatRow, StatsTable};

/// Synthetic row fed to the predictor: home team's latest home row with the away side swapped in.
#[derive(Debug, Clone)]
pub struct PredictionRecord<'t> {
    table: &'t StatsTable,
    cells: Vec<String>,
}

impl<'t> PredictionRecord<'t> {
    pub fn get(&self, column: &str) -> Option<&str> {
        let idx = self.table.column_index(column)?;
        self.cells.get(idx).map(String::as_str)
    }

    pub fn home(&self) -> &str {
        self.get(HOME_COLUMN).unwrap_or_default()
    }

    pub fn away(&self) -> &str {
        self.get(AWAY_COLUMN).unwrap_or_default()
    }
}

/// Latest row where `home` is `team`. Equal dates resolve to the row later in the file;
/// rows with an unreadable date rank below every dated row.
pub fn latest_home_row<'t>(table: &'t StatsTable, team: &str) -> Option<&'t StatRow> {
    latest_by(table, HOME_COLUMN, team)
}

/// Latest row where `away` is `team`.
pub fn latest_away_row<'t>(table: &'t StatsTable, team: &str) -> Option<&'t StatRow> {
    latest_by(table, AWAY_COLUMN, team)
}

fn latest_by<'t>(table: &'t StatsTable, column: &str, team: &str) -> Option<&'t StatRow> {
    let idx = table.column_index(column)?;
    // `max_by_key` keeps the last of several equal maxima.
    table
        .rows()
        .iter()
        .filter(|row| row.cell(idx) == Some(team))
        .max_by_key(|row| row.date())
}

/// Merge the latest stats for `home_team` (as host) and `away_team` (as visitor).
///
/// Returns `None` when either team has no row on the required side; the caller reports
/// missing stats instead of predicting.
pub fn resolve_latest_stats<'t>(
    table: &'t StatsTable,
    home_team: &str,
    away_team: &str,
) -> Option<PredictionRecord<'t>> {
    let home_row = latest_home_row(table, home_team)?;
    let away_row = latest_away_row(table, away_team)?;

    let mut cells = home_row.cells().to_vec();
    for (idx, column) in table.columns().iter().enumerate() {
        if column.starts_with(AWAY_PREFIX)
            && let Some(value) = away_row.cell(idx)
        {
            cells[idx] = value.to_string();
        }
    }

    if let Some(idx) = table.column_index(HOME_COLUMN) {
        cells[idx] = home_team.to_string();
    }
    if let Some(idx) = table.column_index(AWAY_COLUMN) {
        cells[idx] = away_team.to_string();
    }

    Some(PredictionRecord { table, cells })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
date,home,away,home_xg,away_xg,away_form
2024-08-17,Arsenal,Wolves,2.1,0.4,3
2024-09-28,Arsenal,Leicester,2.5,0.9,4
2024-09-01,Arsenal,Brighton,1.2,1.4,7
2024-09-21,Man City,Chelsea,1.9,1.7,10
2024-10-05,Fulham,Chelsea,0.8,2.2,12
2024-09-14,Chelsea,Arsenal,1.1,1.0,9
";

    fn table() -> StatsTable {
        StatsTable::parse(TABLE).unwrap()
    }

    #[test]
    fn latest_home_row_picks_most_recent_date_not_last_line() {
        let t = table();
        let row = latest_home_row(&t, "Arsenal").unwrap();
        assert_eq!(row.cell(3), Some("2.5"));
    }

    #[test]
    fn latest_away_row_only_considers_away_side() {
        let t = table();
        let row = latest_away_row(&t, "Chelsea").unwrap();
        assert_eq!(row.cell(4), Some("2.2"));
        assert!(latest_away_row(&t, "Leicester").is_some());
        assert!(latest_home_row(&t, "Leicester").is_none());
    }

    #[test]
    fn merged_record_takes_away_columns_from_away_row() {
        let t = table();
        let rec = resolve_latest_stats(&t, "Arsenal", "Chelsea").unwrap();
        assert_eq!(rec.get("home_xg"), Some("2.5"));
        assert_eq!(rec.get("away_xg"), Some("2.2"));
        assert_eq!(rec.get("away_form"), Some("12"));
        assert_eq!(rec.get("date"), Some("2024-09-28"));
    }

    #[test]
    fn identifiers_are_forced_to_selection() {
        let t = table();
        let rec = resolve_latest_stats(&t, "Arsenal", "Chelsea").unwrap();
        assert_eq!(rec.home(), "Arsenal");
        assert_eq!(rec.away(), "Chelsea");
    }

    #[test]
    fn missing_side_yields_none() {
        let t = table();
        assert!(resolve_latest_stats(&t, "Wolves", "Chelsea").is_none());
        assert!(resolve_latest_stats(&t, "Arsenal", "Fulham").is_none());
        assert!(resolve_latest_stats(&t, "Nobody", "Chelsea").is_none());
    }

    #[test]
    fn equal_dates_prefer_later_row() {
        let t = StatsTable::parse(
            "date,home,away,home_xg\n2024-01-01,A,B,1.0\n2024-01-01,A,C,2.0\n",
        )
        .unwrap();
        assert_eq!(latest_home_row(&t, "A").unwrap().cell(3), Some("2.0"));
    }

    #[test]
    fn undated_rows_lose_to_dated_rows() {
        let t = StatsTable::parse(
            "date,home,away,home_xg\n2024-01-01,A,B,1.0\nTBD,A,C,2.0\n",
        )
        .unwrap();
        assert_eq!(latest_home_row(&t, "A").unwrap().cell(3), Some("1.0"));
    }
}
