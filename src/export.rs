use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::WriterBuilder;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::derive::BIRTH_DATE_FORMAT;
use crate::filter::ResultSet;
use crate::table::{Value, WorkingTable};

const XLSX_SHEET_NAME: &str = "Scout Results";

/// Text of one exported cell. Dates use the loader's `DD/MM/YYYY` so an
/// export can be loaded back as a dataset.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Date(d) => d.format(BIRTH_DATE_FORMAT).to_string(),
        other => other.to_string(),
    }
}

/// Result rows as UTF-8 CSV: header of every table column, one record per result.
pub fn export_csv(table: &WorkingTable, results: &ResultSet) -> Result<Vec<u8>> {
    let mut wtr = WriterBuilder::new().delimiter(b',').from_writer(Vec::new());
    wtr.write_record(table.column_names())
        .context("write csv header")?;
    for (pos, record) in results.records(table).enumerate() {
        let cells: Vec<String> = (0..table.columns().len())
            .map(|col| cell_text(record.value(col)))
            .collect();
        wtr.write_record(&cells)
            .with_context(|| format!("write csv row {pos}"))?;
    }
    wtr.into_inner().context("flush csv buffer")
}

pub fn export_xlsx(path: &Path, table: &WorkingTable, results: &ResultSet) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(XLSX_SHEET_NAME)
        .context("name results sheet")?;
    write_results(worksheet, table, results)?;
    workbook
        .save(path)
        .with_context(|| format!("save {}", path.display()))?;
    Ok(())
}

fn write_results(worksheet: &mut Worksheet, table: &WorkingTable, results: &ResultSet) -> Result<()> {
    let bold = Format::new().set_bold();
    for (col_idx, name) in table.column_names().enumerate() {
        worksheet
            .write_string_with_format(0, col_idx as u16, name, &bold)
            .with_context(|| format!("write header cell {col_idx}"))?;
    }

    for (pos, record) in results.records(table).enumerate() {
        let row_idx = (pos + 1) as u32;
        for (col_idx, value) in record.values.iter().enumerate() {
            let col = col_idx as u16;
            let written = match value {
                Value::Number(v) => worksheet.write_number(row_idx, col, *v),
                Value::Empty => continue,
                other => worksheet.write_string(row_idx, col, cell_text(other)),
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

pub fn export_file_name(today: NaiveDate, ext: &str) -> String {
    format!("scout_results_{}.{ext}", today.format("%Y%m%d"))
}
