use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::table::RawTable;

const FIRST_NAMES: &[&str] = &[
    "Lucas", "Mateo", "Jonas", "Kofi", "Rafael", "Ivan", "Theo", "Samir", "Diego", "Yuto",
    "Andre", "Milan", "Oscar", "Emeka", "Felipe", "Luka",
];
const LAST_NAMES: &[&str] = &[
    "Silva", "Fernandez", "Keller", "Mensah", "Costa", "Petrov", "Laurent", "Haddad", "Rojas",
    "Tanaka", "Moreau", "Novak", "Lindqvist", "Okafor", "Ribeiro", "Kovac",
];
const NATIONS: &[&str] = &[
    "Brazil", "Argentina", "France", "Germany", "Ghana", "Japan", "Croatia", "Spain", "Niger",
    "Guinea", "Equatorial Guinea", "Portugal", "Nigeria",
];
const CLUBS: &[&str] = &[
    "Atletico Norte", "Real Costa", "FC Ribeira", "Sporting Vale", "Union Sur", "Dynamo Lago",
    "Olympique Mar", "Rapid Serra",
];
const POSITIONS: &[&str] = &[
    "Goalkeeper",
    "Center Back",
    "Left Back",
    "Right Back",
    "Defensive Midfielder",
    "Central Midfielder",
    "Attacking Midfielder",
    "Left Winger",
    "Right Winger",
    "Forward",
];

/// (column, typical maximum for an outfield regular)
const STAT_COLUMNS: &[(&str, f64)] = &[
    ("Advanced_Goalkeeping_psxg", 12.0),
    ("Goalkeeping_saves", 110.0),
    ("Goalkeeping_clean_sheets", 16.0),
    ("Defensive_Actions_tackles", 90.0),
    ("Defensive_Actions_interceptions", 60.0),
    ("Goal_and_Shot_Creation_sca", 140.0),
    ("Miscellaneous_Stats_fouls", 55.0),
    ("Passing_completed", 2400.0),
    ("Passing_pct", 93.0),
    ("Pass_Types_crosses", 150.0),
    ("Possession_touches", 2900.0),
    ("Possession_carries", 1600.0),
    ("Shooting_goals", 28.0),
    ("Shooting_shots", 130.0),
    ("Shooting_xg", 24.0),
];

/// Synthetic scouting table with the same shape as the real export.
pub fn demo_table(players: usize, seed: u64) -> RawTable {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut columns: Vec<String> = ["player", "position", "nationality", "team", "birth_date"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    columns.push("Playing_Time_minutes".to_string());
    columns.push("minutes_90s".to_string());
    columns.extend(STAT_COLUMNS.iter().map(|(c, _)| c.to_string()));

    let rows = (0..players)
        .map(|idx| {
            let position = random_position(&mut rng);
            let is_keeper = position.starts_with("Goalkeeper");
            let minutes: u32 = rng.gen_range(0..=3420);
            let share = minutes as f64 / 3420.0;

            let mut row = vec![
                format!(
                    "{} {}",
                    FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())],
                    LAST_NAMES[(idx + rng.gen_range(0..LAST_NAMES.len())) % LAST_NAMES.len()]
                ),
                position,
                random_nationality(&mut rng),
                CLUBS[rng.gen_range(0..CLUBS.len())].to_string(),
                random_birth_date(&mut rng),
                minutes.to_string(),
                format!("{:.1}", minutes as f64 / 90.0),
            ];

            for (column, max) in STAT_COLUMNS {
                let keeper_stat = column.contains("Goalkeeping");
                let value = if keeper_stat != is_keeper {
                    0.0
                } else if column.ends_with("_pct") {
                    rng.gen_range(55.0..*max)
                } else {
                    (rng.gen_range(0.0..*max) * share).round()
                };
                row.push(if column.ends_with("_pct") || column.ends_with("xg") {
                    format!("{value:.1}")
                } else {
                    format!("{value:.0}")
                });
            }
            row
        })
        .collect();

    RawTable::new(columns, rows)
}

fn random_position(rng: &mut StdRng) -> String {
    let first = POSITIONS[rng.gen_range(0..POSITIONS.len())];
    if first != "Goalkeeper" && rng.gen_bool(0.3) {
        let second = POSITIONS[rng.gen_range(1..POSITIONS.len())];
        if second != first {
            return format!("{first}, {second}");
        }
    }
    first.to_string()
}

fn random_nationality(rng: &mut StdRng) -> String {
    let first = NATIONS[rng.gen_range(0..NATIONS.len())];
    if rng.gen_bool(0.15) {
        let second = NATIONS[rng.gen_range(0..NATIONS.len())];
        if second != first {
            return format!("{first}, {second}");
        }
    }
    first.to_string()
}

fn random_birth_date(rng: &mut StdRng) -> String {
    // A few malformed dates exercise the loader's row dropping.
    if rng.gen_ratio(1, 60) {
        return "unknown".to_string();
    }
    format!(
        "{:02}/{:02}/{}",
        rng.gen_range(1..=28),
        rng.gen_range(1..=12),
        rng.gen_range(1986..=2008)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive_dataset;

    #[test]
    fn demo_table_is_deterministic_and_derivable() {
        let a = demo_table(50, 7);
        let b = demo_table(50, 7);
        assert_eq!(a, b);
        assert_eq!(a.rows.len(), 50);
        assert!(a.rows.iter().all(|r| r.len() == a.columns.len()));

        let table = derive_dataset(&a).unwrap();
        assert!(table.len() <= 50);
        assert!(table.is_numeric("Shooting_goals"));
        assert!(table.is_numeric("Playing_Time_minutes"));
    }
}
