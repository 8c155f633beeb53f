use serde::Serialize;

use crate::catalog::{DEFAULT_RANK_EXCLUDED, rankable_attributes};
use crate::error::ScoutError;
use crate::table::{GeneralPosition, WorkingTable};

pub const DEFAULT_MINUTES_COLUMN: &str = "Playing_Time_minutes";
pub const TOP_N_CHOICES: [usize; 4] = [5, 10, 15, 20];

#[derive(Debug, Clone, PartialEq)]
pub struct RankOptions {
    /// Column holding minutes played; thresholding is skipped when the table lacks it.
    pub minutes_column: String,
    pub excluded: Vec<String>,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            minutes_column: DEFAULT_MINUTES_COLUMN.to_string(),
            excluded: DEFAULT_RANK_EXCLUDED.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPlayer {
    pub row: usize,
    pub player: String,
    pub team: String,
    pub age: u32,
    pub position: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionStats {
    pub position: GeneralPosition,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub attribute: String,
    pub min_minutes: f64,
    /// Size of the threshold-filtered set the stats were computed over.
    pub eligible: usize,
    pub top: Vec<RankedPlayer>,
    pub position_stats: Vec<PositionStats>,
}

pub fn rank(
    table: &WorkingTable,
    attribute: &str,
    min_minutes: f64,
    top_n: usize,
) -> Result<Ranking, ScoutError> {
    rank_with(table, attribute, min_minutes, top_n, &RankOptions::default())
}

pub fn rank_with(
    table: &WorkingTable,
    attribute: &str,
    min_minutes: f64,
    top_n: usize,
    opts: &RankOptions,
) -> Result<Ranking, ScoutError> {
    let excluded: Vec<&str> = opts.excluded.iter().map(String::as_str).collect();
    if !rankable_attributes(table, &excluded).iter().any(|a| a == attribute) {
        return Err(ScoutError::invalid_attribute(attribute));
    }
    let Some(attr_idx) = table.column_index(attribute) else {
        return Err(ScoutError::invalid_attribute(attribute));
    };

    let minutes_idx = table
        .column_index(&opts.minutes_column)
        .filter(|_| table.is_numeric(&opts.minutes_column));
    let eligible: Vec<usize> = match minutes_idx {
        Some(m) => (0..table.len())
            .filter(|&row| table.number(row, m).is_some_and(|v| v >= min_minutes))
            .collect(),
        None => (0..table.len()).collect(),
    };

    let mut scored: Vec<(usize, f64)> = eligible
        .iter()
        .filter_map(|&row| table.number(row, attr_idx).map(|v| (row, v)))
        .collect();

    let position_stats = position_stats(table, &scored);

    // Stable sort keeps dataset order among equal values.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(top_n);

    let top = scored
        .into_iter()
        .filter_map(|(row, value)| {
            let r = table.row(row)?;
            Some(RankedPlayer {
                row,
                player: r.name.clone(),
                team: r.team.clone(),
                age: r.age,
                position: r.position.clone(),
                value,
            })
        })
        .collect();

    Ok(Ranking {
        attribute: attribute.to_string(),
        min_minutes,
        eligible: eligible.len(),
        top,
        position_stats,
    })
}

fn position_stats(table: &WorkingTable, scored: &[(usize, f64)]) -> Vec<PositionStats> {
    GeneralPosition::ALL
        .iter()
        .filter_map(|&pos| {
            let values: Vec<f64> = scored
                .iter()
                .filter(|(row, _)| table.row(*row).is_some_and(|r| r.general_position == pos))
                .map(|(_, v)| *v)
                .collect();
            describe(pos, values)
        })
        .collect()
}

fn describe(position: GeneralPosition, mut values: Vec<f64>) -> Option<PositionStats> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    };
    Some(PositionStats {
        position,
        count: n,
        mean: round2(mean),
        min: round2(values[0]),
        max: round2(values[n - 1]),
        median: round2(median),
    })
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Nearest allowed top-N choice, preferring the smaller on ties.
pub fn snap_top_n(n: usize) -> usize {
    TOP_N_CHOICES
        .iter()
        .copied()
        .min_by_key(|c| c.abs_diff(n))
        .unwrap_or(10)
}
