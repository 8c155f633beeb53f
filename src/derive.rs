use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;

use crate::error::ScoutError;
use crate::table::{
    AGE_COLUMN, BIRTH_DATE_COLUMN, Column, ColumnKind, GENERAL_POSITION_COLUMN, GeneralPosition,
    NATIONALITY_COLUMN, PLAYER_COLUMN, POSITION_COLUMN, PlayerRecord, RawTable, TEAM_COLUMN, Value,
    WorkingTable, position_label,
};

pub const BIRTH_DATE_FORMAT: &str = "%d/%m/%Y";
const DAYS_PER_YEAR: f64 = 365.25;

static POSITION_MAP: Lazy<HashMap<&'static str, GeneralPosition>> = Lazy::new(|| {
    use GeneralPosition::*;
    HashMap::from([
        ("Goalkeeper", Goalkeeper),
        ("Defender", Defender),
        ("Fullback", Defender),
        ("Left Back", Defender),
        ("Right Back", Defender),
        ("Center Back", Defender),
        ("Midfielder", Midfielder),
        ("Defensive Midfielder", Midfielder),
        ("Central Midfielder", Midfielder),
        ("Left Midfielder", Midfielder),
        ("Right Midfielder", Midfielder),
        ("Wide Midfielder", Midfielder),
        ("Attacking Midfielder", Midfielder),
        ("Forward", Forward),
        ("Left Winger", Forward),
        ("Right Winger", Forward),
    ])
});

/// Coarse role from the first listed position; unknown roles map to `Other`.
pub fn general_position(raw: &str) -> GeneralPosition {
    let first = raw.split(',').next().unwrap_or_default().trim();
    POSITION_MAP
        .get(first)
        .copied()
        .unwrap_or(GeneralPosition::Other)
}

pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), BIRTH_DATE_FORMAT).ok()
}

/// Whole years between `birth` and `today` (days / 365.25, floored).
/// `None` for birth dates after `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    let days = today.signed_duration_since(birth).num_days();
    if days < 0 {
        return None;
    }
    Some((days as f64 / DAYS_PER_YEAR).floor() as u32)
}

pub fn derive_dataset(raw: &RawTable) -> Result<WorkingTable, ScoutError> {
    derive_dataset_at(raw, Local::now().date_naive())
}

pub fn derive_dataset_at(raw: &RawTable, today: NaiveDate) -> Result<WorkingTable, ScoutError> {
    let mut names: Vec<String> = raw.columns.iter().map(|c| c.trim().to_string()).collect();
    let find = |names: &[String], wanted: &str| names.iter().position(|n| n == wanted);
    let require = |names: &[String], wanted: &str| {
        find(names, wanted).ok_or_else(|| ScoutError::MissingColumn {
            column: wanted.to_string(),
        })
    };

    let player_idx = require(&names, PLAYER_COLUMN)?;
    let position_idx = require(&names, POSITION_COLUMN)?;
    let nationality_idx = require(&names, NATIONALITY_COLUMN)?;
    let team_idx = require(&names, TEAM_COLUMN)?;
    let birth_idx = require(&names, BIRTH_DATE_COLUMN)?;
    let raw_width = names.len();
    let text_columns = [player_idx, position_idx, nationality_idx, team_idx];

    let age_idx = find(&names, AGE_COLUMN).unwrap_or_else(|| {
        names.push(AGE_COLUMN.to_string());
        names.len() - 1
    });
    let general_idx = find(&names, GENERAL_POSITION_COLUMN).unwrap_or_else(|| {
        names.push(GENERAL_POSITION_COLUMN.to_string());
        names.len() - 1
    });

    // Kind is decided over every input row, kept or not.
    let mut saw_text = vec![false; names.len()];
    let mut rows = Vec::with_capacity(raw.rows.len());
    let mut dropped = 0usize;

    for cells in &raw.rows {
        let cell = |idx: usize| cells.get(idx).map(String::as_str).unwrap_or_default();

        let mut values: Vec<Value> = (0..raw_width)
            .map(|idx| {
                if text_columns.contains(&idx) {
                    let s = cell(idx).trim();
                    if s.is_empty() {
                        Value::Empty
                    } else {
                        Value::Text(s.to_string())
                    }
                } else {
                    Value::parse(cell(idx))
                }
            })
            .collect();
        values.resize(names.len(), Value::Empty);
        for (idx, v) in values.iter().enumerate() {
            if matches!(v, Value::Text(_)) {
                saw_text[idx] = true;
            }
        }

        let Some(birth_date) = parse_birth_date(cell(birth_idx)) else {
            dropped += 1;
            continue;
        };
        let Some(age) = age_on(birth_date, today) else {
            dropped += 1;
            continue;
        };

        let position = cell(position_idx).trim().to_string();
        let general = general_position(&position);
        values[birth_idx] = Value::Date(birth_date);
        values[age_idx] = Value::Number(age as f64);
        values[general_idx] = Value::Text(position_label(general).to_string());

        rows.push(PlayerRecord {
            name: cell(player_idx).trim().to_string(),
            position,
            nationality: cell(nationality_idx).trim().to_string(),
            team: cell(team_idx).trim().to_string(),
            birth_date,
            age,
            general_position: general,
            values,
        });
    }

    if dropped > 0 {
        log::debug!("dropped {dropped} rows without a usable birth date");
    }

    let columns = names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let kind = if idx == birth_idx {
                ColumnKind::Date
            } else if idx == age_idx {
                ColumnKind::Numeric
            } else if idx == general_idx || text_columns.contains(&idx) || saw_text[idx] {
                ColumnKind::Text
            } else {
                ColumnKind::Numeric
            };
            Column { name, kind }
        })
        .collect();

    Ok(WorkingTable::from_parts(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_turns_over_on_the_twentieth_birthday() {
        let today = date(2026, 10, 19);
        assert_eq!(age_on(date(2006, 10, 19), today), Some(20));
        assert_eq!(age_on(date(2006, 10, 20), today), Some(19));
        assert_eq!(age_on(today, today), Some(0));
        assert_eq!(age_on(date(2027, 1, 1), today), None);
    }

    #[test]
    fn first_listed_position_decides_the_group() {
        assert_eq!(general_position("Center Back, Left Back"), GeneralPosition::Defender);
        assert_eq!(general_position(" Left Winger ,Forward"), GeneralPosition::Forward);
        assert_eq!(general_position("Goalkeeper"), GeneralPosition::Goalkeeper);
        assert_eq!(general_position("Wide Midfielder"), GeneralPosition::Midfielder);
        assert_eq!(general_position("Striker"), GeneralPosition::Other);
        assert_eq!(general_position(""), GeneralPosition::Other);
    }

    #[test]
    fn birth_date_uses_day_month_year() {
        assert_eq!(parse_birth_date("17/05/2000"), Some(date(2000, 5, 17)));
        assert_eq!(parse_birth_date("2000-05-17"), None);
        assert_eq!(parse_birth_date("31/02/2000"), None);
    }

    #[test]
    fn derivation_trims_headers_and_drops_bad_dates() {
        let raw = RawTable::new(
            vec![
                " player".into(),
                "position ".into(),
                "nationality".into(),
                "team".into(),
                "birth_date".into(),
                " Shooting_goals ".into(),
                "foot".into(),
            ],
            vec![
                vec!["A".into(), "Forward".into(), "Brazil".into(), "X".into(), "01/01/2000".into(), "3".into(), "left".into()],
                vec!["B".into(), "Forward".into(), "Brazil".into(), "X".into(), "not a date".into(), "oops".into(), "right".into()],
                vec!["C".into(), "Center Back".into(), "Chile".into(), "Y".into(), "01/01/1990".into(), "".into()],
            ],
        );
        let table = derive_dataset_at(&raw, date(2026, 10, 19)).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.column_index("player").is_some());
        assert!(table.column_index("position").is_some());
        // "oops" lives in a dropped row but still makes the column textual.
        assert!(!table.is_numeric("Shooting_goals"));
        assert!(table.is_numeric("age"));
        assert_eq!(table.kind("foot"), Some(ColumnKind::Text));
        assert_eq!(table.rows()[0].age, 26);
        assert_eq!(table.rows()[1].age, 36);
        assert_eq!(table.rows()[1].general_position, GeneralPosition::Defender);
        let gp = table.column_index("general_position").unwrap();
        assert_eq!(table.rows()[1].value(gp), &Value::Text("Defender".to_string()));
    }

    #[test]
    fn derive_dataset_ages_against_the_local_calendar_day() {
        let today = Local::now().date_naive();
        let row = |name: &str, birth: NaiveDate| -> Vec<String> {
            vec![
                name.into(),
                "Forward".into(),
                "Ghana".into(),
                "X".into(),
                birth.format(BIRTH_DATE_FORMAT).to_string(),
            ]
        };
        let raw = RawTable::new(
            vec!["player".into(), "position".into(), "nationality".into(), "team".into(), "birth_date".into()],
            vec![
                row("exact", today - chrono::Duration::days(7305)),
                row("one day short", today - chrono::Duration::days(7304)),
            ],
        );
        let table = derive_dataset(&raw).unwrap();
        assert_eq!(table.rows()[0].age, 20);
        assert_eq!(table.rows()[1].age, 19);
    }

    #[test]
    fn missing_identity_column_is_reported() {
        let raw = RawTable::new(
            vec!["player".into(), "position".into(), "team".into(), "birth_date".into()],
            Vec::new(),
        );
        let err = derive_dataset_at(&raw, date(2026, 1, 1)).unwrap_err();
        assert_eq!(
            err,
            ScoutError::MissingColumn {
                column: "nationality".to_string()
            }
        );
    }
}
