//! Cell normalization and township tagging.

use crate::config::TOWNSHIP_COLUMN;
use crate::models::{CellValue, Table};

/// Strip leading and trailing whitespace from every text cell.
///
/// Numbers, dates, booleans and errors are left untouched.
pub fn trim_text_cells(table: &mut Table) {
    table.map_cells(|cell| {
        if let CellValue::Text(s) = cell {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                *s = trimmed.to_string();
            }
        }
    });
}

/// Clean a row-style sheet: trim text and force `TOWNSHIP` to the sheet name.
pub fn clean_row_sheet(mut table: Table, sheet_name: &str) -> Table {
    trim_text_cells(&mut table);
    table.set_constant_column(TOWNSHIP_COLUMN, CellValue::text(sheet_name));
    table
}

/// Clean a column-style sheet: trim text, columns unchanged.
pub fn clean_column_sheet(mut table: Table) -> Table {
    trim_text_cells(&mut table);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new(vec!["Name".into(), "Age".into()]);
        t.push_row(vec![CellValue::text("  Aye  "), CellValue::Number(30.0)]);
        t.push_row(vec![CellValue::text("\tMya\u{3000}"), CellValue::text(" 12 ")]);
        t.push_row(vec![CellValue::text("   "), CellValue::Empty]);
        t
    }

    #[test]
    fn test_trim_text_cells() {
        let mut t = sample();
        trim_text_cells(&mut t);

        assert_eq!(t.cell(0, "Name"), Some(&CellValue::text("Aye")));
        assert_eq!(t.cell(0, "Age"), Some(&CellValue::Number(30.0)));
        assert_eq!(t.cell(1, "Name"), Some(&CellValue::text("Mya")));
        assert_eq!(t.cell(1, "Age"), Some(&CellValue::text("12")));
        assert_eq!(t.cell(2, "Name"), Some(&CellValue::text("")));
        assert!(t.cell(2, "Age").unwrap().is_empty());
    }

    #[test]
    fn test_clean_row_sheet_tags_township() {
        let t = clean_row_sheet(sample(), "Kyauktaw");
        assert_eq!(t.columns(), &["Name", "Age", "TOWNSHIP"]);
        for row in 0..t.height() {
            assert_eq!(t.cell(row, "TOWNSHIP"), Some(&CellValue::text("Kyauktaw")));
        }
    }

    #[test]
    fn test_clean_column_sheet_keeps_columns() {
        let t = clean_column_sheet(sample());
        assert_eq!(t.columns(), &["Name", "Age"]);
        assert_eq!(t.cell(0, "Name"), Some(&CellValue::text("Aye")));
    }
}
