use rust_xlsxwriter::{Workbook, XlsxError};
use tabcap_core::Table;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Spreadsheet write failed: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Serialize a merged table to a single-sheet XLSX workbook in memory.
///
/// One header row with the column names (the provenance column comes last
/// by merge contract), then one row per table row in batch order. All
/// values are written as strings; no styling.
pub fn to_xlsx(table: &Table) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in table.column_names().iter().enumerate() {
        sheet.write_string(0, col as u16, name)?;
    }
    for (r, row) in table.rows().iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.write_string(r as u32 + 1, c as u16, value)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}
