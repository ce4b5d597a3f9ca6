use crate::metrics::pivot_index;
use crate::types::{Dataset, MonthlySeries, YearPair, MONTHS_PER_YEAR};
use chrono::Month;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Dataset compiled into the binary; `--data` replaces it.
static EMBEDDED_DATASET: &str = include_str!("../data/revenue.json");

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("expected 12 month labels, found {0}")]
    MonthCount(usize),
    #[error("unknown month label: {0}")]
    UnknownMonth(String),
    #[error("month {found} follows {previous}, months must be consecutive")]
    MonthOrder { previous: String, found: String },
    #[error("pivot month {0} is not one of the month labels")]
    PivotMissing(String),
    #[error("dataset has no teams")]
    NoTeams,
    #[error("duplicate team name: {0}")]
    DuplicateTeam(String),
    #[error("team {0} has no authorities")]
    NoAuthorities(String),
    #[error("yearly total of {0} does not fit in a 64-bit amount")]
    AmountOverflow(String),
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub teams: usize,
    pub authorities: usize,
    pub pivot_month: String,
    pub pivot_index: usize,
}

pub fn load_embedded() -> Result<(Dataset, LoadReport), LoadError> {
    parse_dataset(EMBEDDED_DATASET)
}

pub fn load_from_path(path: &Path) -> Result<(Dataset, LoadReport), LoadError> {
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Read dataset from {}", path.display());
    parse_dataset(&json)
}

pub fn parse_dataset(json: &str) -> Result<(Dataset, LoadReport), LoadError> {
    // Series lengths are checked by `MonthlySeries` during deserialization.
    let mut dataset: Dataset = serde_json::from_str(json)?;

    validate_months(&dataset.months)?;
    dataset.pivot_index = pivot_index(&dataset.months, &dataset.pivot_month)
        .ok_or_else(|| LoadError::PivotMissing(dataset.pivot_month.clone()))?;

    if dataset.teams.is_empty() {
        return Err(LoadError::NoTeams);
    }
    let mut seen = HashSet::new();
    for team in &dataset.teams {
        if !seen.insert(team.name.as_str()) {
            return Err(LoadError::DuplicateTeam(team.name.clone()));
        }
        if team.authorities.is_empty() {
            return Err(LoadError::NoAuthorities(team.name.clone()));
        }
    }
    // Running totals never exceed the yearly total, so checking that is enough.
    check_yearly_totals("All Teams", &dataset.all_teams)?;
    for team in &dataset.teams {
        check_yearly_totals(&team.name, &team.series)?;
        for auth in &team.authorities {
            check_yearly_totals(&auth.name, &auth.series)?;
        }
    }

    let report = LoadReport {
        teams: dataset.teams.len(),
        authorities: dataset.teams.iter().map(|t| t.authorities.len()).sum(),
        pivot_month: dataset.pivot_month.clone(),
        pivot_index: dataset.pivot_index,
    };
    log::info!(
        "Loaded {} teams, {} authorities, pivot {} at index {}",
        report.teams,
        report.authorities,
        report.pivot_month,
        report.pivot_index
    );
    Ok((dataset, report))
}

fn check_yearly_totals(name: &str, series: &YearPair<MonthlySeries>) -> Result<(), LoadError> {
    for (year, s) in [("current", &series.current), ("prior", &series.prior)] {
        s.as_slice()
            .iter()
            .try_fold(0u64, |total, v| total.checked_add(*v))
            .ok_or_else(|| LoadError::AmountOverflow(format!("{} ({})", name, year)))?;
    }
    Ok(())
}

/// Twelve distinct calendar months, each following the previous one.
fn validate_months(months: &[String]) -> Result<(), LoadError> {
    if months.len() != MONTHS_PER_YEAR {
        return Err(LoadError::MonthCount(months.len()));
    }
    let parsed = months
        .iter()
        .map(|m| {
            m.parse::<Month>()
                .map_err(|_| LoadError::UnknownMonth(m.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    for (i, pair) in parsed.windows(2).enumerate() {
        if pair[0].succ() != pair[1] {
            return Err(LoadError::MonthOrder {
                previous: months[i].clone(),
                found: months[i + 1].clone(),
            });
        }
    }
    Ok(())
}
