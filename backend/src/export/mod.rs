//! Generated workbooks.
//!
//! A processing pass produces up to three [`OutputFile`]s, each an xlsx
//! workbook written in memory with rust_xlsxwriter.

pub mod format;

use rust_xlsxwriter::Workbook;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{COLUMN_STYLE_FILE, FINAL_FILE, PLACEHOLDER_SHEET, ROW_STYLE_FILE};
use crate::error::ExportResult;
use crate::models::Table;

pub use format::{column_widths, write_table, SheetFormats, DATE_FORMAT, TIME_FORMAT};

/// Which of the three downloads a file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputKind {
    RowStyle,
    ColumnStyle,
    Final,
}

impl OutputKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            OutputKind::RowStyle => ROW_STYLE_FILE,
            OutputKind::ColumnStyle => COLUMN_STYLE_FILE,
            OutputKind::Final => FINAL_FILE,
        }
    }

    /// Download button label.
    pub fn label(&self) -> &'static str {
        match self {
            OutputKind::RowStyle => "Download Row-Style Sheets",
            OutputKind::ColumnStyle => "Download Column-Style Sheets & Summary",
            OutputKind::Final => "Download Final Restructured File",
        }
    }
}

/// A finished workbook ready to be offered for download.
#[derive(Debug, Clone)]
pub struct OutputFile {
    pub kind: OutputKind,
    /// Sheet names in workbook order.
    pub sheet_names: Vec<String>,
    pub bytes: Vec<u8>,
}

impl OutputFile {
    /// Render `sheets` into an xlsx workbook.
    pub fn build(kind: OutputKind, sheets: &[(&str, &Table)]) -> ExportResult<Self> {
        let bytes = write_workbook(sheets)?;
        Ok(Self {
            kind,
            sheet_names: sheets.iter().map(|(name, _)| name.to_string()).collect(),
            bytes,
        })
    }

    pub fn file_name(&self) -> &'static str {
        self.kind.file_name()
    }

    /// Write the workbook into `dir` under its download name.
    pub fn write_to_dir(&self, dir: &Path) -> ExportResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Write named tables, in order, into an xlsx buffer.
///
/// An empty list still yields a valid workbook holding one blank sheet.
pub fn write_workbook(sheets: &[(&str, &Table)]) -> ExportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let formats = SheetFormats::default();

    if sheets.is_empty() {
        workbook.add_worksheet().set_name(PLACEHOLDER_SHEET)?;
    }

    for (name, table) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name)?;
        write_table(worksheet, name, table, &formats)?;
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;
    use crate::parser::SourceWorkbook;
    use chrono::NaiveDate;

    fn sample() -> Table {
        let mut t = Table::new(vec!["Name".into(), "Visit Date".into(), "Count".into()]);
        let visit = NaiveDate::from_ymd_opt(2023, 11, 20)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap();
        t.push_row(vec![
            CellValue::text("Aye"),
            CellValue::DateTime(visit),
            CellValue::Number(3.0),
        ]);
        t.push_row(vec![CellValue::text("Mya"), CellValue::Empty, CellValue::Bool(true)]);
        t
    }

    #[test]
    fn test_written_workbook_reads_back() {
        let table = sample();
        let bytes = write_workbook(&[("Summary", &table), ("Muse", &table)]).unwrap();

        let mut wb = SourceWorkbook::from_bytes(&bytes).unwrap();
        assert_eq!(wb.sheet_names(), &["Summary", "Muse"]);

        let back = wb.load_table("Muse").unwrap();
        assert_eq!(back.columns(), table.columns());
        assert_eq!(back.height(), 2);
        assert_eq!(back.cell(0, "Count"), Some(&CellValue::Number(3.0)));
        assert_eq!(back.cell(1, "Count"), Some(&CellValue::Bool(true)));
        // time of day is dropped, only the date is kept
        assert_eq!(back.cell(0, "Visit Date").unwrap().render(), "2023-11-20");
    }

    #[test]
    fn test_empty_workbook_has_placeholder_sheet() {
        let bytes = write_workbook(&[]).unwrap();
        let mut wb = SourceWorkbook::from_bytes(&bytes).unwrap();
        assert_eq!(wb.sheet_names(), &[PLACEHOLDER_SHEET]);
        assert_eq!(wb.load_table(PLACEHOLDER_SHEET).unwrap().width(), 0);
    }

    #[test]
    fn test_output_file_metadata() {
        let table = sample();
        let file = OutputFile::build(OutputKind::RowStyle, &[("Summary", &table)]).unwrap();
        assert_eq!(file.file_name(), "Row_Style_Sheets.xlsx");
        assert_eq!(file.sheet_names, vec!["Summary"]);
        assert!(!file.bytes.is_empty());
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let table = sample();
        let file = OutputFile::build(OutputKind::Final, &[("Kutkai", &table)]).unwrap();

        let path = file.write_to_dir(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "Final_Restructured_Data.xlsx");
        assert_eq!(std::fs::read(path).unwrap(), file.bytes);
    }
}
