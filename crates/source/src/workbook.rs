//! First-sheet reading for `.xlsx` and `.xls` workbooks, via calamine.

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use docmerge_traits::{SourceError, Table, TableReader};
use std::io::Cursor;

#[derive(Debug, Default, Clone, Copy)]
pub struct WorkbookTableReader;

impl WorkbookTableReader {
    pub fn new() -> Self {
        Self
    }
}

impl TableReader for WorkbookTableReader {
    fn read_first_table(&self, bytes: &[u8]) -> Result<Table, SourceError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| SourceError::Malformed(format!("Failed to open workbook: {}", e)))?;

        let sheet_names = workbook.sheet_names();
        let name = sheet_names.first().cloned().ok_or(SourceError::NoSheets)?;
        if sheet_names.len() > 1 {
            log::debug!(
                "Workbook has {} sheets; only '{}' is read",
                sheet_names.len(),
                name
            );
        }

        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| SourceError::Malformed(format!("Failed to read sheet '{}': {}", name, e)))?;

        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();

        Ok(Table::new(name, rows))
    }

    fn name(&self) -> &'static str {
        "calamine"
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{:.0}", f)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERR:{:?}", e),
    }
}
