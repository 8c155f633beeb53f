use std::env;
use std::path::PathBuf;

use crate::ranking::{DEFAULT_MINUTES_COLUMN, RankOptions, snap_top_n};

const DEFAULT_DATA_PATH: &str = "fbref_player_stats_final.csv";
const DEFAULT_DESCRIPTIONS_PATH: &str = "descriptions.csv";
const DEFAULT_ATTRIBUTE: &str = "Shooting_goals";

#[derive(Debug, Clone, PartialEq)]
pub struct ScoutConfig {
    pub data_path: PathBuf,
    pub data_delimiter: u8,
    pub descriptions_path: PathBuf,
    pub descriptions_delimiter: u8,
    pub min_minutes: f64,
    pub top_n: usize,
    pub default_attribute: String,
    pub minutes_column: String,
    pub demo: bool,
    pub demo_players: usize,
    pub demo_seed: u64,
    pub log_level: log::LevelFilter,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            data_delimiter: b',',
            descriptions_path: PathBuf::from(DEFAULT_DESCRIPTIONS_PATH),
            descriptions_delimiter: b';',
            min_minutes: 90.0,
            top_n: 10,
            default_attribute: DEFAULT_ATTRIBUTE.to_string(),
            minutes_column: DEFAULT_MINUTES_COLUMN.to_string(),
            demo: false,
            demo_players: 400,
            demo_seed: 26,
            log_level: log::LevelFilter::Info,
        }
    }
}

impl ScoutConfig {
    /// Reads `SCOUT_*` variables; call after `dotenvy` has loaded `.env` files.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            data_path: get("SCOUT_DATA_PATH").map(PathBuf::from).unwrap_or(d.data_path),
            data_delimiter: get("SCOUT_DATA_DELIMITER")
                .and_then(|v| parse_delimiter(&v))
                .unwrap_or(d.data_delimiter),
            descriptions_path: get("SCOUT_DESCRIPTIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or(d.descriptions_path),
            descriptions_delimiter: get("SCOUT_DESCRIPTIONS_DELIMITER")
                .and_then(|v| parse_delimiter(&v))
                .unwrap_or(d.descriptions_delimiter),
            min_minutes: get("SCOUT_MIN_MINUTES")
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(d.min_minutes),
            top_n: get("SCOUT_TOP_N")
                .and_then(|v| v.parse::<usize>().ok())
                .map(snap_top_n)
                .unwrap_or(d.top_n),
            default_attribute: get("SCOUT_DEFAULT_ATTRIBUTE").unwrap_or(d.default_attribute),
            minutes_column: get("SCOUT_MINUTES_COLUMN").unwrap_or(d.minutes_column),
            demo: get("SCOUT_DEMO").is_some_and(|v| parse_flag(&v)),
            demo_players: get("SCOUT_DEMO_PLAYERS")
                .and_then(|v| v.parse::<usize>().ok())
                .map(|n| n.clamp(1, 20_000))
                .unwrap_or(d.demo_players),
            demo_seed: get("SCOUT_DEMO_SEED")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(d.demo_seed),
            log_level: get("SCOUT_LOG")
                .and_then(|v| v.parse::<log::LevelFilter>().ok())
                .unwrap_or(d.log_level),
        }
    }

    pub fn rank_options(&self) -> RankOptions {
        RankOptions {
            minutes_column: self.minutes_column.clone(),
            ..RankOptions::default()
        }
    }
}

fn parse_delimiter(raw: &str) -> Option<u8> {
    match raw {
        "\\t" | "tab" => Some(b'\t'),
        s if s.len() == 1 => s.bytes().next(),
        _ => None,
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn lookup_overrides_and_bad_values_fall_back() {
        let vars = HashMap::from([
            ("SCOUT_DATA_PATH", "data/players.csv"),
            ("SCOUT_MIN_MINUTES", "not-a-number"),
            ("SCOUT_TOP_N", "12"),
            ("SCOUT_DESCRIPTIONS_DELIMITER", "tab"),
            ("SCOUT_DEMO", "Yes"),
            ("SCOUT_LOG", "debug"),
        ]);
        let cfg = ScoutConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.data_path, PathBuf::from("data/players.csv"));
        assert_eq!(cfg.min_minutes, 90.0);
        assert_eq!(cfg.top_n, 10);
        assert_eq!(cfg.descriptions_delimiter, b'\t');
        assert!(cfg.demo);
        assert_eq!(cfg.log_level, log::LevelFilter::Debug);
        assert_eq!(cfg.default_attribute, "Shooting_goals");
    }

    #[test]
    fn empty_lookup_is_default() {
        assert_eq!(ScoutConfig::from_lookup(|_| None), ScoutConfig::default());
    }
}
