use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

pub const PLAYER_COLUMN: &str = "player";
pub const POSITION_COLUMN: &str = "position";
pub const NATIONALITY_COLUMN: &str = "nationality";
pub const TEAM_COLUMN: &str = "team";
pub const BIRTH_DATE_COLUMN: &str = "birth_date";
pub const AGE_COLUMN: &str = "age";
pub const GENERAL_POSITION_COLUMN: &str = "general_position";

pub const IDENTITY_COLUMNS: [&str; 5] = [
    PLAYER_COLUMN,
    POSITION_COLUMN,
    NATIONALITY_COLUMN,
    TEAM_COLUMN,
    BIRTH_DATE_COLUMN,
];

/// Tabular input as handed over by the loader: header + string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Empty,
}

impl Value {
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return Value::Empty;
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Value::Number(v),
            Ok(_) => Value::Empty,
            Err(_) => Value::Text(s.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Empty => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
    Date,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum GeneralPosition {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    Other,
}

impl GeneralPosition {
    pub const ALL: [GeneralPosition; 5] = [
        GeneralPosition::Goalkeeper,
        GeneralPosition::Defender,
        GeneralPosition::Midfielder,
        GeneralPosition::Forward,
        GeneralPosition::Other,
    ];
}

pub fn position_label(pos: GeneralPosition) -> &'static str {
    match pos {
        GeneralPosition::Goalkeeper => "Goalkeeper",
        GeneralPosition::Defender => "Defender",
        GeneralPosition::Midfielder => "Midfielder",
        GeneralPosition::Forward => "Forward",
        GeneralPosition::Other => "Other",
    }
}

impl fmt::Display for GeneralPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(position_label(*self))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub name: String,
    pub position: String,
    pub nationality: String,
    pub team: String,
    pub birth_date: NaiveDate,
    pub age: u32,
    pub general_position: GeneralPosition,
    /// One value per working-table column, in column order.
    pub values: Vec<Value>,
}

impl PlayerRecord {
    pub fn value(&self, col: usize) -> &Value {
        self.values.get(col).unwrap_or(&Value::Empty)
    }
}

/// The derived, read-only dataset every engine operation runs against.
#[derive(Debug, Clone, Default)]
pub struct WorkingTable {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    rows: Vec<PlayerRecord>,
}

impl WorkingTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(columns: Vec<Column>, rows: Vec<PlayerRecord>) -> Self {
        let mut index = HashMap::with_capacity(columns.len());
        for (idx, col) in columns.iter().enumerate() {
            index.entry(col.name.clone()).or_insert(idx);
        }
        Self {
            columns,
            index,
            rows,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        self.column_index(name).map(|idx| self.columns[idx].kind)
    }

    pub fn is_numeric(&self, name: &str) -> bool {
        self.kind(name) == Some(ColumnKind::Numeric)
    }

    pub fn rows(&self) -> &[PlayerRecord] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> Option<&PlayerRecord> {
        self.rows.get(idx)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn number(&self, row: usize, col: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.value(col).as_number())
    }

    /// Largest value of a numeric column, ignoring missing cells.
    pub fn column_max(&self, col: usize) -> Option<f64> {
        self.rows
            .iter()
            .filter_map(|r| r.value(col).as_number())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_parse_classifies_cells() {
        assert_eq!(Value::parse(" 12.5 "), Value::Number(12.5));
        assert_eq!(Value::parse("7"), Value::Number(7.0));
        assert_eq!(Value::parse("   "), Value::Empty);
        assert_eq!(Value::parse("Brazil"), Value::Text("Brazil".to_string()));
        assert_eq!(Value::parse("NaN"), Value::Empty);
    }

    #[test]
    fn value_display_is_plain() {
        assert_eq!(Value::Number(10.0).to_string(), "10");
        assert_eq!(Value::Number(0.25).to_string(), "0.25");
        let d = NaiveDate::from_ymd_opt(2001, 3, 9).unwrap();
        assert_eq!(Value::Date(d).to_string(), "2001-03-09");
        assert_eq!(Value::Empty.to_string(), "");
    }
}
