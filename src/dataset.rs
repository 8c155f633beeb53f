use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::ReaderBuilder;

use crate::config::ScoutConfig;
use crate::demo;
use crate::derive::derive_dataset;
use crate::table::{RawTable, WorkingTable};

pub const DESCRIPTION_PLACEHOLDER: &str = "Description not available.";

pub fn read_csv_table(path: &Path, delimiter: u8) -> Result<RawTable> {
    let file = File::open(path).with_context(|| format!("open dataset {}", path.display()))?;
    parse_csv_table(file, delimiter).with_context(|| format!("parse dataset {}", path.display()))
}

pub fn parse_csv_table(reader: impl Read, delimiter: u8) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = rdr
        .headers()
        .context("read header row")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("read record {}", idx + 1))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable::new(columns, rows))
}

/// Help text per attribute column. Lookups never fail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Descriptions {
    map: HashMap<String, String>,
}

impl Descriptions {
    pub fn get(&self, column: &str) -> &str {
        self.map
            .get(column)
            .map(String::as_str)
            .unwrap_or(DESCRIPTION_PLACEHOLDER)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Key is the first field, description the third; later duplicates win.
pub fn parse_descriptions(reader: impl Read, delimiter: u8) -> Result<Descriptions> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut map = HashMap::new();
    for record in rdr.records() {
        let record = record.context("read description row")?;
        let (Some(key), Some(desc)) = (record.get(0), record.get(2)) else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        map.insert(key.to_string(), desc.trim().to_string());
    }
    Ok(Descriptions { map })
}

pub fn load_descriptions(path: &Path, delimiter: u8) -> Descriptions {
    let parsed = File::open(path)
        .with_context(|| format!("open descriptions {}", path.display()))
        .and_then(|file| parse_descriptions(file, delimiter));
    match parsed {
        Ok(desc) => desc,
        Err(err) => {
            log::warn!("Attribute descriptions unavailable, help text disabled: {err:#}");
            Descriptions::default()
        }
    }
}

/// Last modification date of the data file as `DD/MM/YYYY`.
pub fn dataset_updated_on(path: &Path) -> Option<String> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    let dt: DateTime<Utc> = modified.into();
    Some(dt.format("%d/%m/%Y").to_string())
}

#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub table: WorkingTable,
    /// Set when the dataset could not be loaded; the table is then empty.
    pub diagnostic: Option<String>,
}

pub fn load_working_table(cfg: &ScoutConfig) -> LoadOutcome {
    let raw = if cfg.demo {
        log::info!("Using synthetic demo dataset ({} players)", cfg.demo_players);
        Ok(demo::demo_table(cfg.demo_players, cfg.demo_seed))
    } else {
        read_csv_table(&cfg.data_path, cfg.data_delimiter)
    };

    let derived = raw.and_then(|raw| derive_dataset(&raw).map_err(anyhow::Error::from));
    match derived {
        Ok(table) => {
            log::info!(
                "Loaded {} players with {} columns",
                table.len(),
                table.columns().len()
            );
            LoadOutcome {
                table,
                diagnostic: None,
            }
        }
        Err(err) => {
            let msg = format!("Could not load dataset: {err:#}");
            log::warn!("{msg}");
            LoadOutcome {
                table: WorkingTable::empty(),
                diagnostic: Some(msg),
            }
        }
    }
}
