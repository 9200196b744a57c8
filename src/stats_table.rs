use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::LoadError;

pub const HOME_COLUMN: &str = "home";
pub const AWAY_COLUMN: &str = "away";
pub const DATE_COLUMN: &str = "date";
pub const AWAY_PREFIX: &str = "away_";

/// One historical match row. Cells stay as read; numbers are parsed on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    cells: Vec<String>,
    date: Option<NaiveDate>,
}

impl StatRow {
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn cell(&self, idx: usize) -> Option<&str> {
        self.cells.get(idx).map(String::as_str)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

/// Season statistics, in file order. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct StatsTable {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<StatRow>,
    home_idx: usize,
    away_idx: usize,
}

impl StatsTable {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, LoadError> {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(raw.as_bytes());

        let header = reader.headers()?;
        if header.is_empty() {
            return Err(LoadError::EmptyTable);
        }
        let columns = header
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let name = name.trim();
                // Same name pandas gives a blank header cell (usually a saved index).
                if name.is_empty() {
                    format!("Unnamed: {i}")
                } else {
                    name.to_string()
                }
            })
            .collect::<Vec<_>>();

        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(LoadError::DuplicateColumn(name.clone()));
            }
        }

        let require = |name: &str| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };
        let home_idx = require(HOME_COLUMN)?;
        let away_idx = require(AWAY_COLUMN)?;
        let date_idx = require(DATE_COLUMN)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(ragged_or_csv)?;
            let cells = record.iter().map(str::to_string).collect::<Vec<_>>();
            let date = parse_date(&cells[date_idx]);
            rows.push(StatRow { cells, date });
        }

        if rows.is_empty() {
            return Err(LoadError::EmptyTable);
        }

        Ok(Self {
            columns,
            index,
            rows,
            home_idx,
            away_idx,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn rows(&self) -> &[StatRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn home_of<'a>(&self, row: &'a StatRow) -> &'a str {
        row.cell(self.home_idx).unwrap_or_default()
    }

    pub fn away_of<'a>(&self, row: &'a StatRow) -> &'a str {
        row.cell(self.away_idx).unwrap_or_default()
    }

    /// Every team seen on either side, sorted and de-duplicated.
    pub fn team_names(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        for row in &self.rows {
            for name in [self.home_of(row), self.away_of(row)] {
                if !name.trim().is_empty() {
                    names.insert(name.to_string());
                }
            }
        }
        names.into_iter().collect()
    }
}

fn ragged_or_csv(err: csv::Error) -> LoadError {
    if let csv::ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = err.kind()
    {
        return LoadError::RaggedRow {
            line: pos.as_ref().map_or(0, |p| p.line() as usize),
            expected: *expected_len as usize,
            found: *len as usize,
        };
    }
    LoadError::Csv(err)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(cleaned, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(dt.date());
        }
    }
    None
}
