mod common;

use scout_terminal::catalog::AttributeCatalog;
use scout_terminal::dataset::parse_csv_table;
use scout_terminal::derive::derive_dataset_at;
use scout_terminal::export::{cell_text, export_csv, export_xlsx};
use scout_terminal::filter::{AttributeRanges, IdentificationCriteria, ResultSet, search};

use common::{squad, today};

#[test]
fn csv_export_keeps_every_column_and_the_result_order() {
    let table = squad();
    let catalog = AttributeCatalog::build(&table);
    let ident = IdentificationCriteria {
        clubs: ["Real Costa".to_string()].into_iter().collect(),
        ..Default::default()
    };
    let results = search(&table, &ident, &AttributeRanges::unrestricted(&catalog)).unwrap();

    let bytes = export_csv(&table, &results).unwrap();
    let mut rdr = csv::ReaderBuilder::new().from_reader(bytes.as_slice());

    let header: Vec<String> = rdr.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(header, table.column_names().collect::<Vec<_>>());

    let records: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), results.len());
    for (record, player) in records.iter().zip(results.records(&table)) {
        assert_eq!(record.len(), header.len());
        for col in 0..header.len() {
            assert_eq!(&record[col], cell_text(player.value(col)), "column {}", header[col]);
        }
    }

    let col = |name: &str| table.column_index(name).unwrap();
    assert_eq!(&records[0][col("player")], "Ana Silva");
    assert_eq!(&records[0][col("birth_date")], "01/01/2000");
    assert_eq!(&records[0][col("Playing_Time_minutes")], "900");
    assert_eq!(&records[2][col("Shooting_goals")], "");
}

#[test]
fn exported_csv_loads_back_as_the_same_players() {
    let table = squad();
    let all = ResultSet::from_rows((0..table.len()).collect());
    let bytes = export_csv(&table, &all).unwrap();

    let reloaded = derive_dataset_at(&parse_csv_table(bytes.as_slice(), b',').unwrap(), today()).unwrap();
    assert_eq!(reloaded.len(), table.len());
    assert_eq!(reloaded.column_names().collect::<Vec<_>>(), table.column_names().collect::<Vec<_>>());
    for (before, after) in table.rows().iter().zip(reloaded.rows()) {
        assert_eq!(before.name, after.name);
        assert_eq!(before.birth_date, after.birth_date);
        assert_eq!(before.age, after.age);
        assert_eq!(before.values, after.values);
    }
}

#[test]
fn empty_result_set_exports_only_the_header() {
    let table = squad();
    let bytes = export_csv(&table, &ResultSet::default()).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with("player,position,nationality,team,birth_date"));
}

#[test]
fn xlsx_export_writes_a_workbook() {
    let table = squad();
    let results = ResultSet::from_rows(vec![0, 2, 4]);
    let path = std::env::temp_dir().join(format!("scout_export_{}.xlsx", std::process::id()));

    export_xlsx(&path, &table, &results).unwrap();
    let meta = std::fs::metadata(&path).unwrap();
    assert!(meta.len() > 0);
    let _ = std::fs::remove_file(&path);
}
