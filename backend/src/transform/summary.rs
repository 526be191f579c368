//! Summary tables derived from cleaned sheets.
//!
//! Row-style summaries stack whole sheets; column-style summaries stack a
//! projection of each sheet onto its registration/visit columns.

use regex::{Regex, RegexBuilder};

use crate::config::{SOURCE_SHEET_COLUMN, TOWNSHIP_COLUMN};
use crate::models::{CellValue, Table};

/// Case-insensitive substring filter over column names.
#[derive(Debug, Clone)]
pub struct ColumnFilter {
    /// `None` when there are no keywords: nothing matches.
    pattern: Option<Regex>,
}

impl ColumnFilter {
    /// Match any column whose name contains one of `keywords`.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, regex::Error> {
        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k.as_ref()))
            .collect::<Vec<_>>()
            .join("|");

        if keywords.is_empty() {
            return Ok(Self { pattern: None });
        }

        let pattern = RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn matches(&self, column: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|re| re.is_match(column))
    }
}

/// Stack row-style sheets into the summary table.
pub fn row_summary<'a>(tables: impl IntoIterator<Item = &'a Table>) -> Table {
    Table::stack(tables)
}

/// Project a cleaned column-style sheet onto its summary columns.
///
/// Keeps matching columns in sheet order, then appends `SOURCE_SHEET` and
/// `TOWNSHIP`, both set to the sheet name. A sheet without matching columns
/// yields rows holding only the two tag columns.
pub fn column_projection(table: &Table, sheet_name: &str, filter: &ColumnFilter) -> Table {
    let mut projection = table.select_columns(|name| filter.matches(name));
    projection.set_constant_column(SOURCE_SHEET_COLUMN, CellValue::text(sheet_name));
    projection.set_constant_column(TOWNSHIP_COLUMN, CellValue::text(sheet_name));
    projection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SUMMARY_KEYWORDS;

    fn filter() -> ColumnFilter {
        ColumnFilter::new(DEFAULT_SUMMARY_KEYWORDS).unwrap()
    }

    fn sheet(columns: &[&str], rows: usize) -> Table {
        let mut t = Table::new(columns.iter().map(|c| c.to_string()).collect());
        for i in 0..rows {
            t.push_row(columns.iter().map(|c| CellValue::text(format!("{c}-{i}"))).collect());
        }
        t
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let f = filter();
        assert!(f.matches("REGISTRATION NUMBER"));
        assert!(f.matches("Date of registration"));
        assert!(f.matches("Visit 2"));
        assert!(f.matches("follow-up VISIT date"));
        assert!(!f.matches("PATIENT NAME"));
        assert!(!f.matches("Regist."));
    }

    #[test]
    fn test_filter_escapes_keywords() {
        let f = ColumnFilter::new(&["a.b"]).unwrap();
        assert!(f.matches("col A.B"));
        assert!(!f.matches("axb"));
    }

    #[test]
    fn test_empty_filter_matches_nothing() {
        let f = ColumnFilter::new::<&str>(&[]).unwrap();
        assert!(!f.matches("Registration"));
        assert!(!f.matches(""));
    }

    #[test]
    fn test_column_projection() {
        let t = sheet(&["Registration No", "Name", "Visit Date", "TOWNSHIP"], 2);
        let p = column_projection(&t, "Kutkai", &filter());

        assert_eq!(
            p.columns(),
            &["Registration No", "Visit Date", "SOURCE_SHEET", "TOWNSHIP"]
        );
        assert_eq!(p.height(), 2);
        assert_eq!(p.cell(1, "Visit Date"), Some(&CellValue::text("Visit Date-1")));
        assert_eq!(p.cell(0, "SOURCE_SHEET"), Some(&CellValue::text("Kutkai")));
        assert_eq!(p.cell(0, "TOWNSHIP"), Some(&CellValue::text("Kutkai")));
    }

    #[test]
    fn test_projection_without_matching_columns() {
        let t = sheet(&["Name", "Age"], 3);
        let p = column_projection(&t, "Muse", &filter());

        assert_eq!(p.columns(), &["SOURCE_SHEET", "TOWNSHIP"]);
        assert_eq!(p.height(), 3);
    }

    #[test]
    fn test_row_summary_row_count() {
        let a = sheet(&["Name", "TOWNSHIP"], 2);
        let b = sheet(&["Name", "Phone", "TOWNSHIP"], 5);
        let summary = row_summary([&a, &b]);

        assert_eq!(summary.height(), 7);
        assert_eq!(summary.columns(), &["Name", "TOWNSHIP", "Phone"]);
    }
}
