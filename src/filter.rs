use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;

use crate::catalog::AttributeCatalog;
use crate::error::ScoutError;
use crate::table::{PlayerRecord, WorkingTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeRange {
    pub lo: u32,
    pub hi: u32,
}

impl AgeRange {
    pub fn new(lo: u32, hi: u32) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, age: u32) -> bool {
        self.lo <= age && age <= self.hi
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub lo: f64,
    pub hi: f64,
}

impl ValueRange {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, v: f64) -> bool {
        self.lo <= v && v <= self.hi
    }
}

/// How nationality/position needles are compared with the comma-joined field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMatch {
    /// Case-sensitive containment, so "Niger" also matches "Nigeria".
    #[default]
    Substring,
    /// One of the trimmed comma-separated tokens equals the needle.
    Token,
}

impl TextMatch {
    pub fn matches(self, field: &str, needles: &[String]) -> bool {
        if needles.is_empty() {
            return true;
        }
        match self {
            TextMatch::Substring => needles.iter().any(|n| field.contains(n.as_str())),
            TextMatch::Token => field
                .split(',')
                .map(str::trim)
                .any(|token| needles.iter().any(|n| n == token)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentificationCriteria {
    pub age: Option<AgeRange>,
    pub nationalities: Vec<String>,
    pub positions: Vec<String>,
    pub clubs: BTreeSet<String>,
    pub text_match: TextMatch,
}

impl IdentificationCriteria {
    pub fn matches(&self, row: &PlayerRecord) -> bool {
        if let Some(age) = self.age
            && !age.contains(row.age)
        {
            return false;
        }
        if !self.text_match.matches(&row.nationality, &self.nationalities) {
            return false;
        }
        if !self.text_match.matches(&row.position, &self.positions) {
            return false;
        }
        self.clubs.is_empty() || self.clubs.contains(&row.team)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeRanges {
    ranges: BTreeMap<String, Option<ValueRange>>,
}

impl AttributeRanges {
    pub fn unrestricted(catalog: &AttributeCatalog) -> Self {
        Self {
            ranges: catalog
                .attributes()
                .map(|a| (a.column.clone(), None))
                .collect(),
        }
    }

    /// Maps slider positions to ranges; a slider left at its full `[0, max]`
    /// extent applies no restriction.
    pub fn from_sliders<'a>(
        catalog: &AttributeCatalog,
        sliders: impl IntoIterator<Item = (&'a str, f64, f64)>,
    ) -> Result<Self, ScoutError> {
        let mut out = Self::unrestricted(catalog);
        for (column, lo, hi) in sliders {
            let attr = catalog
                .attribute(column)
                .ok_or_else(|| ScoutError::invalid_attribute(column))?;
            let (min, max) = attr.slider_bounds();
            if lo <= min && hi >= max {
                out.clear(column)?;
            } else {
                out.set(column, lo, hi)?;
            }
        }
        Ok(out)
    }

    pub fn set(&mut self, column: &str, lo: f64, hi: f64) -> Result<(), ScoutError> {
        let slot = self
            .ranges
            .get_mut(column)
            .ok_or_else(|| ScoutError::invalid_attribute(column))?;
        *slot = Some(ValueRange::new(lo, hi));
        Ok(())
    }

    pub fn clear(&mut self, column: &str) -> Result<(), ScoutError> {
        let slot = self
            .ranges
            .get_mut(column)
            .ok_or_else(|| ScoutError::invalid_attribute(column))?;
        *slot = None;
        Ok(())
    }

    pub fn get(&self, column: &str) -> Option<ValueRange> {
        self.ranges.get(column).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn active(&self) -> impl Iterator<Item = (&str, ValueRange)> {
        self.ranges
            .iter()
            .filter_map(|(col, range)| range.map(|r| (col.as_str(), r)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    rows: Vec<usize>,
}

impl ResultSet {
    pub fn from_rows(rows: Vec<usize>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records<'a>(&'a self, table: &'a WorkingTable) -> impl Iterator<Item = &'a PlayerRecord> {
        self.rows.iter().filter_map(|&idx| table.row(idx))
    }
}

pub fn search(
    table: &WorkingTable,
    identification: &IdentificationCriteria,
    ranges: &AttributeRanges,
) -> Result<ResultSet, ScoutError> {
    let mut checks: Vec<(usize, ValueRange)> = Vec::new();
    for (column, range) in ranges.active() {
        if !table.is_numeric(column) {
            return Err(ScoutError::invalid_attribute(column));
        }
        if range.lo.is_nan() || range.hi.is_nan() || range.lo > range.hi {
            return Err(ScoutError::InvalidRange {
                column: column.to_string(),
                lo: range.lo,
                hi: range.hi,
            });
        }
        if let Some(idx) = table.column_index(column) {
            checks.push((idx, range));
        }
    }

    let rows = table
        .rows()
        .par_iter()
        .enumerate()
        .filter(|(_, row)| identification.matches(row))
        .filter(|(_, row)| {
            checks.iter().all(|(idx, range)| {
                row.value(*idx)
                    .as_number()
                    .is_some_and(|v| range.contains(v))
            })
        })
        .map(|(idx, _)| idx)
        .collect();

    Ok(ResultSet { rows })
}
