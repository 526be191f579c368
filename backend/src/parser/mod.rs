//! Workbook reader built on calamine.
//!
//! Turns an uploaded workbook into [`Table`]s: the first row of each sheet's
//! used range is the header, the following non-blank rows are data.

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use crate::error::{WorkbookError, WorkbookResult};
use crate::models::{CellValue, Table};

/// Anything the pipeline can pull named sheets from.
pub trait SheetSource {
    /// Sheet names in workbook order.
    fn sheet_names(&self) -> &[String];

    /// Load one sheet as a table.
    fn load_table(&mut self, sheet: &str) -> WorkbookResult<Table>;
}

/// An uploaded workbook held fully in memory.
pub struct SourceWorkbook {
    sheets: Sheets<Cursor<Vec<u8>>>,
    sheet_names: Vec<String>,
}

impl SourceWorkbook {
    /// Open a workbook from raw bytes (xlsx, xlsm, xlsb, xls or ods).
    pub fn from_bytes(bytes: &[u8]) -> WorkbookResult<Self> {
        let sheets = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| WorkbookError::Open(e.to_string()))?;
        let sheet_names = sheets.sheet_names();

        Ok(Self {
            sheets,
            sheet_names,
        })
    }

    /// Open a workbook file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> WorkbookResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Load one sheet as a table.
    pub fn load_table(&mut self, sheet: &str) -> WorkbookResult<Table> {
        if !self.sheet_names.iter().any(|n| n == sheet) {
            return Err(WorkbookError::MissingSheet(sheet.to_string()));
        }

        let range = self
            .sheets
            .worksheet_range(sheet)
            .map_err(|e| WorkbookError::Sheet {
                sheet: sheet.to_string(),
                message: e.to_string(),
            })?;

        Ok(range_to_table(&range))
    }
}

impl SheetSource for SourceWorkbook {
    fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    fn load_table(&mut self, sheet: &str) -> WorkbookResult<Table> {
        SourceWorkbook::load_table(self, sheet)
    }
}

/// Convert a used range into a table.
///
/// The used range starts at the first non-empty column; blank leading columns
/// are restored so every column keeps its sheet position.
pub fn range_to_table(range: &Range<Data>) -> Table {
    let mut rows = range.rows();

    let Some(header_row) = rows.next() else {
        return Table::default();
    };

    let leading = range.start().map_or(0, |(_, col)| col as usize);

    let mut header = vec![Data::Empty; leading];
    header.extend_from_slice(header_row);

    let mut table = Table::new(header_names(&header));
    for row in rows {
        let cells: Vec<CellValue> = row.iter().map(convert_cell).collect();
        if cells.iter().all(CellValue::is_empty) {
            continue;
        }
        let mut padded = vec![CellValue::Empty; leading];
        padded.extend(cells);
        table.push_row(padded);
    }
    table
}

/// Render header cells into unique column names.
///
/// Blank headers become `Unnamed: <index>`; repeated names get `.1`, `.2`, ...
pub fn header_names(row: &[Data]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(row.len());

    for (idx, cell) in row.iter().enumerate() {
        let rendered = convert_cell(cell).render();
        let base = if rendered.is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            rendered
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while used.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        used.insert(name.clone());
        names.push(name);
    }

    names
}

/// Map a calamine cell onto the crate's cell model.
pub fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                return CellValue::Number(dt.as_f64());
            }
            // Serials below one day hold a time of day, not a date
            if (0.0..1.0).contains(&dt.as_f64()) {
                if let Some(time) = dt.as_datetime().map(|d| d.time()) {
                    return CellValue::Time(time);
                }
            }
            dt.as_datetime()
                .map(CellValue::DateTime)
                .unwrap_or_else(|| CellValue::Number(dt.as_f64()))
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    fn sample_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        let sheet = workbook.add_worksheet();
        sheet.set_name("Kutkai").unwrap();
        sheet.write_string(0, 0, "Name").unwrap();
        sheet.write_string(0, 2, "Name").unwrap();
        sheet.write_string(0, 3, "Visit Date").unwrap();
        sheet.write_string(1, 0, "  Aye Aye ").unwrap();
        sheet.write_number(1, 1, 42).unwrap();
        sheet.write_string(1, 2, "dup").unwrap();
        let date = ExcelDateTime::from_ymd(2024, 1, 15).unwrap();
        sheet
            .write_datetime_with_format(1, 3, &date, &date_format)
            .unwrap();
        // row 2 left blank on purpose
        sheet.write_string(3, 0, "Mya").unwrap();

        let other = workbook.add_worksheet();
        other.set_name("Notes").unwrap();
        other.write_string(0, 0, "free text").unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_sheet_names_in_workbook_order() {
        let wb = SourceWorkbook::from_bytes(&sample_workbook()).unwrap();
        assert_eq!(wb.sheet_names(), &["Kutkai", "Notes"]);
    }

    #[test]
    fn test_load_table_headers() {
        let mut wb = SourceWorkbook::from_bytes(&sample_workbook()).unwrap();
        let table = wb.load_table("Kutkai").unwrap();
        assert_eq!(
            table.columns(),
            &["Name", "Unnamed: 1", "Name.1", "Visit Date"]
        );
    }

    #[test]
    fn test_load_table_skips_blank_rows() {
        let mut wb = SourceWorkbook::from_bytes(&sample_workbook()).unwrap();
        let table = wb.load_table("Kutkai").unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(table.cell(1, "Name"), Some(&CellValue::text("Mya")));
        assert!(table.cell(1, "Visit Date").unwrap().is_empty());
    }

    #[test]
    fn test_load_table_cell_types() {
        let mut wb = SourceWorkbook::from_bytes(&sample_workbook()).unwrap();
        let table = wb.load_table("Kutkai").unwrap();

        // reading never trims
        assert_eq!(table.cell(0, "Name"), Some(&CellValue::text("  Aye Aye ")));
        assert_eq!(table.cell(0, "Unnamed: 1"), Some(&CellValue::Number(42.0)));

        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            table.cell(0, "Visit Date"),
            Some(&CellValue::DateTime(expected))
        );
    }

    #[test]
    fn test_blank_leading_column_kept() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Muse").unwrap();
        sheet.write_string(0, 1, "Name").unwrap();
        sheet.write_string(0, 3, "Phone").unwrap();
        sheet.write_string(1, 1, "Aye").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let mut wb = SourceWorkbook::from_bytes(&bytes).unwrap();
        let table = wb.load_table("Muse").unwrap();
        assert_eq!(
            table.columns(),
            &["Unnamed: 0", "Name", "Unnamed: 2", "Phone"]
        );
        assert!(table.cell(0, "Unnamed: 0").unwrap().is_empty());
        assert_eq!(table.cell(0, "Name"), Some(&CellValue::text("Aye")));
    }

    #[test]
    fn test_time_of_day_cell() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Kutkai").unwrap();
        sheet.write_string(0, 0, "Visit Time").unwrap();
        sheet
            .write_number_with_format(1, 0, 8.5 / 24.0, &Format::new().set_num_format("hh:mm"))
            .unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let mut wb = SourceWorkbook::from_bytes(&bytes).unwrap();
        let table = wb.load_table("Kutkai").unwrap();
        let expected = chrono::NaiveTime::from_hms_opt(8, 30, 0).unwrap();
        assert_eq!(table.cell(0, "Visit Time"), Some(&CellValue::Time(expected)));
    }

    #[test]
    fn test_missing_sheet() {
        let mut wb = SourceWorkbook::from_bytes(&sample_workbook()).unwrap();
        let err = wb.load_table("Muse").unwrap_err();
        assert!(matches!(err, WorkbookError::MissingSheet(_)));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let result = SourceWorkbook::from_bytes(b"name;age\nAlice;30\n");
        assert!(matches!(result, Err(WorkbookError::Open(_))));
    }

    #[test]
    fn test_header_names_numeric_and_repeated() {
        let row = vec![
            Data::Float(2023.0),
            Data::String("x".into()),
            Data::String("x".into()),
            Data::String("x".into()),
            Data::Empty,
        ];
        assert_eq!(
            header_names(&row),
            vec!["2023", "x", "x.1", "x.2", "Unnamed: 4"]
        );
    }

    #[test]
    fn test_iso_datetime_cells() {
        let cell = convert_cell(&Data::DateTimeIso("2023-05-01".into()));
        assert_eq!(cell.render(), "2023-05-01");
        let odd = convert_cell(&Data::DateTimeIso("not a date".into()));
        assert_eq!(odd, CellValue::text("not a date"));
    }
}
