#![allow(dead_code)]

use chrono::NaiveDate;

use scout_terminal::derive::derive_dataset_at;
use scout_terminal::table::{RawTable, WorkingTable};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

pub fn raw(columns: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    )
}

/// Five players: two Brazilians (one also Italian), an Italian with no goals
/// recorded, a Nigerian winger and an Argentine keeper.
pub fn squad() -> WorkingTable {
    let raw = raw(
        &[
            "player",
            "position",
            "nationality",
            "team",
            "birth_date",
            "Playing_Time_minutes",
            "Shooting_goals",
            "Passing_pct",
        ],
        &[
            &["Ana Silva", "Forward", "Brazil", "Real Costa", "01/01/2000", "900", "10", "80"],
            &["Bruno Reis", "Center Back", "Brazil, Italy", "Union Sur", "01/01/1996", "1800", "2", "85"],
            &["Caio Lima", "Goalkeeper", "Argentina", "Real Costa", "01/01/2002", "3000", "0", "60"],
            &["Dahir Ali", "Left Winger", "Nigeria", "Dynamo Lago", "01/01/2004", "45", "10", "70"],
            &["Enzo Russo", "Central Midfielder", "Italy", "Real Costa", "01/01/1999", "2500", "", "90"],
        ],
    );
    derive_dataset_at(&raw, today()).unwrap()
}

pub fn names(table: &WorkingTable, rows: &[usize]) -> Vec<String> {
    rows.iter()
        .map(|r| table.row(*r).unwrap().name.clone())
        .collect()
}

/// Brazilian, French and Argentine players in an order that follows neither
/// name, age nor goals.
pub fn mixed_nations() -> WorkingTable {
    let raw = raw(
        &["player", "position", "nationality", "team", "birth_date", "Shooting_goals"],
        &[
            &["Zeca Matos", "Forward", "Brazil", "Union Sur", "01/01/2005", "3"],
            &["Antoine Roux", "Center Back", "France", "Real Costa", "01/01/1998", "9"],
            &["Mateo Diaz", "Left Winger", "Argentina", "Union Sur", "01/01/2006", "5"],
            &["Bruno Alves", "Central Midfielder", "Brazil", "Rapid Serra", "01/01/2000", "1"],
            &["Lucien Morel", "Right Winger", "France", "Real Costa", "01/01/2007", "7"],
        ],
    );
    derive_dataset_at(&raw, today()).unwrap()
}
