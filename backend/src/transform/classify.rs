//! Split a workbook's sheets into row-style and column-style townships.

use serde::Serialize;

use crate::config::TownshipCatalog;

/// Result of matching a workbook's sheet names against the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Column-style sheets present in the workbook, in catalog order.
    pub column_sheets: Vec<String>,
    /// Row-style sheets present in the workbook, in catalog order.
    pub row_sheets: Vec<String>,
    /// Workbook sheets in neither list, in workbook order.
    pub ignored: Vec<String>,
}

/// Classify sheet names.
///
/// Matched lists follow the catalog's order, not the workbook's.
pub fn classify(sheet_names: &[String], catalog: &TownshipCatalog) -> Classification {
    let present = |name: &&String| sheet_names.contains(*name);

    let column_sheets: Vec<String> = catalog
        .column_style
        .iter()
        .filter(present)
        .cloned()
        .collect();
    let row_sheets: Vec<String> = catalog.row_style.iter().filter(present).cloned().collect();

    let ignored = sheet_names
        .iter()
        .filter(|name| !column_sheets.contains(*name) && !row_sheets.contains(*name))
        .cloned()
        .collect();

    Classification {
        column_sheets,
        row_sheets,
        ignored,
    }
}
