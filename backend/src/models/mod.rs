//! Domain models for the reshaping pipeline.
//!
//! - [`CellValue`] - A single spreadsheet cell
//! - [`Table`] - Header row plus data rows, the unit every stage works on
//! - [`SheetCategory`] - Which pipeline a sheet belongs to

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

// =============================================================================
// Cells
// =============================================================================

/// A cell value as read from, or written to, a worksheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// Time of day without a date (a serial value below one day).
    Time(NaiveTime),
    /// Spreadsheet error literal such as `#DIV/0!`.
    Error(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the cell the way it would be displayed in a plain-text view.
    ///
    /// Integral numbers lose their fraction, and date/times at midnight are
    /// rendered as a bare date.
    pub fn render(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::DateTime(dt) => {
                if dt.time() == NaiveTime::MIN {
                    dt.date().format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
            CellValue::Time(t) => t.format("%H:%M:%S").to_string(),
            CellValue::Error(e) => e.clone(),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

// =============================================================================
// Tables
// =============================================================================

/// A 2-D table: a header row of unique column names and data rows.
///
/// Every row always has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create an empty table with the given header.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of data rows (header excluded).
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[col])
    }

    /// Append a row, padding with empty cells or truncating to the table width.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(row);
    }

    /// Apply `f` to every data cell.
    pub fn map_cells(&mut self, mut f: impl FnMut(&mut CellValue)) {
        for row in &mut self.rows {
            row.iter_mut().for_each(&mut f);
        }
    }

    /// Set `name` to `value` on every row.
    ///
    /// An existing column keeps its position and is overwritten; otherwise
    /// the column is appended at the end.
    pub fn set_constant_column(&mut self, name: &str, value: CellValue) {
        let col = match self.column_index(name) {
            Some(col) => col,
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(CellValue::Empty);
                }
                self.columns.len() - 1
            }
        };
        for row in &mut self.rows {
            row[col] = value.clone();
        }
    }

    /// Keep only the columns whose name satisfies `keep`, in their original order.
    pub fn select_columns(&self, mut keep: impl FnMut(&str) -> bool) -> Table {
        let indices: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, name)| keep(name))
            .map(|(i, _)| i)
            .collect();

        Table {
            columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// Stack tables vertically.
    ///
    /// The result's columns are the union of all input columns in order of
    /// first appearance; cells a source table does not have are left empty.
    pub fn stack<'a>(tables: impl IntoIterator<Item = &'a Table>) -> Table {
        let tables: Vec<&Table> = tables.into_iter().collect();

        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for name in &table.columns {
                if !columns.contains(name) {
                    columns.push(name.clone());
                }
            }
        }

        let mut stacked = Table::new(columns);
        for table in tables {
            let mapping: Vec<usize> = table
                .columns
                .iter()
                .filter_map(|name| stacked.column_index(name))
                .collect();
            for row in &table.rows {
                let mut out = vec![CellValue::Empty; stacked.width()];
                for (src, &dst) in mapping.iter().enumerate() {
                    out[dst] = row[src].clone();
                }
                stacked.rows.push(out);
            }
        }
        stacked
    }
}

// =============================================================================
// Sheet Categories
// =============================================================================

/// Pipeline a source sheet is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SheetCategory {
    /// Records stacked into the row-style summary.
    RowStyle,
    /// Registration/visit columns projected into the column-style summary.
    ColumnStyle,
    /// Not in the catalog; dropped.
    Ignored,
}

impl std::fmt::Display for SheetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            SheetCategory::RowStyle => "row-style",
            SheetCategory::ColumnStyle => "column-style",
            SheetCategory::Ignored => "ignored",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        let mut t = Table::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            t.push_row(row.iter().map(|v| CellValue::text(*v)).collect());
        }
        t
    }

    #[test]
    fn test_render_numbers() {
        assert_eq!(CellValue::Number(2023.0).render(), "2023");
        assert_eq!(CellValue::Number(1.5).render(), "1.5");
        assert_eq!(CellValue::Number(-4.0).render(), "-4");
    }

    #[test]
    fn test_render_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let midnight = CellValue::DateTime(date.and_hms_opt(0, 0, 0).unwrap());
        let afternoon = CellValue::DateTime(date.and_hms_opt(14, 5, 0).unwrap());
        assert_eq!(midnight.render(), "2024-03-09");
        assert_eq!(afternoon.render(), "2024-03-09 14:05:00");

        let shift = CellValue::Time(NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(shift.render(), "08:30:00");
    }

    #[test]
    fn test_push_row_pads_short_rows() {
        let mut t = Table::new(vec!["a".into(), "b".into(), "c".into()]);
        t.push_row(vec![CellValue::text("1")]);
        assert_eq!(t.rows()[0].len(), 3);
        assert!(t.rows()[0][2].is_empty());
    }

    #[test]
    fn test_set_constant_column_appends() {
        let mut t = table(&["name"], &[&["Aye"], &["Mya"]]);
        t.set_constant_column("TOWNSHIP", CellValue::text("Muse"));
        assert_eq!(t.columns(), &["name", "TOWNSHIP"]);
        assert_eq!(t.cell(1, "TOWNSHIP"), Some(&CellValue::text("Muse")));
    }

    #[test]
    fn test_set_constant_column_overwrites_in_place() {
        let mut t = table(&["TOWNSHIP", "name"], &[&["old", "Aye"]]);
        t.set_constant_column("TOWNSHIP", CellValue::text("Minbya"));
        assert_eq!(t.columns(), &["TOWNSHIP", "name"]);
        assert_eq!(t.cell(0, "TOWNSHIP"), Some(&CellValue::text("Minbya")));
    }

    #[test]
    fn test_select_columns_keeps_order() {
        let t = table(&["a", "b", "c"], &[&["1", "2", "3"]]);
        let s = t.select_columns(|c| c != "b");
        assert_eq!(s.columns(), &["a", "c"]);
        assert_eq!(s.rows()[0], vec![CellValue::text("1"), CellValue::text("3")]);
    }

    #[test]
    fn test_stack_unions_columns() {
        let first = table(&["a", "b"], &[&["1", "2"]]);
        let second = table(&["b", "c"], &[&["3", "4"], &["5", "6"]]);
        let stacked = Table::stack([&first, &second]);

        assert_eq!(stacked.columns(), &["a", "b", "c"]);
        assert_eq!(stacked.height(), 3);
        assert!(stacked.cell(0, "c").unwrap().is_empty());
        assert!(stacked.cell(1, "a").unwrap().is_empty());
        assert_eq!(stacked.cell(2, "c"), Some(&CellValue::text("6")));
    }

    #[test]
    fn test_stack_of_nothing_is_empty() {
        let stacked = Table::stack(std::iter::empty());
        assert_eq!(stacked.width(), 0);
        assert_eq!(stacked.height(), 0);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(SheetCategory::RowStyle.to_string(), "row-style");
        assert_eq!(SheetCategory::ColumnStyle.to_string(), "column-style");
    }
}
