//! High-level pipeline: one uploaded workbook in, up to three workbooks out.
//!
//! A pass runs these stages in order, logging each step:
//!
//! 1. Open the workbook and classify its sheets against the catalog
//! 2. Row-style sheets: trim, tag with `TOWNSHIP`, stack into `Summary`
//! 3. Column-style sheets: trim, project registration/visit columns into `Summary`
//! 4. Final restructured workbook combining both
//!
//! Any error stops the pass and becomes a single error log line. Files
//! produced before the failure are kept in the report.
//!
//! # Example
//!
//! ```rust,ignore
//! use reshaper::{reshape_file, TownshipCatalog};
//!
//! let report = reshape_file("registers.xlsx", &TownshipCatalog::default());
//! for file in &report.outputs {
//!     println!("{} ({} sheets)", file.file_name(), file.sheet_names.len());
//! }
//! ```

use std::path::Path;

use super::classify::{classify, Classification};
use super::clean::{clean_column_sheet, clean_row_sheet};
use super::summary::{column_projection, row_summary, ColumnFilter};
use crate::api::logs::ProcessingLog;
use crate::config::{TownshipCatalog, SUMMARY_SHEET};
use crate::error::{ReshapeResult, WorkbookResult};
use crate::export::{OutputFile, OutputKind};
use crate::models::Table;
use crate::parser::{SheetSource, SourceWorkbook};

/// Outcome of one processing pass.
#[derive(Debug, Clone)]
pub struct ReshapeReport {
    /// Name of the uploaded file.
    pub file_name: String,
    /// Sheet classification; empty when the workbook could not be opened.
    pub classification: Classification,
    /// Generated workbooks, in the order they were produced.
    pub outputs: Vec<OutputFile>,
    /// Cumulative log of the pass.
    pub log: ProcessingLog,
    /// Message of the error that stopped the pass, if any.
    pub error: Option<String>,
}

impl ReshapeReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn output(&self, kind: OutputKind) -> Option<&OutputFile> {
        self.outputs.iter().find(|f| f.kind == kind)
    }
}

/// Run a pass over an uploaded workbook held in memory.
pub fn reshape_bytes(file_name: &str, bytes: &[u8], catalog: &TownshipCatalog) -> ReshapeReport {
    reshape_with(file_name, catalog, || SourceWorkbook::from_bytes(bytes))
}

/// Run a pass over a workbook file on disk.
pub fn reshape_file<P: AsRef<Path>>(path: P, catalog: &TownshipCatalog) -> ReshapeReport {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    reshape_with(&file_name, catalog, || SourceWorkbook::open(path))
}

/// Run a pass over any sheet source.
///
/// `open` is called once, after the upload has been logged, so a source that
/// cannot be opened still yields a report with its error line.
pub fn reshape_with<S: SheetSource>(
    file_name: &str,
    catalog: &TownshipCatalog,
    open: impl FnOnce() -> WorkbookResult<S>,
) -> ReshapeReport {
    let mut report = ReshapeReport {
        file_name: file_name.to_string(),
        classification: Classification::default(),
        outputs: Vec::new(),
        log: ProcessingLog::new(),
        error: None,
    };

    report.log.success(format!("File uploaded: {}", file_name));

    match open()
        .map_err(Into::into)
        .and_then(|workbook| run_stages(workbook, catalog, &mut report))
    {
        Ok(()) => report.log.info("🎉 All files processed successfully!"),
        Err(e) => {
            report.log.error(format!("Error: {}", e));
            report.error = Some(e.to_string());
        }
    }

    report
}

fn run_stages<S: SheetSource>(
    mut workbook: S,
    catalog: &TownshipCatalog,
    report: &mut ReshapeReport,
) -> ReshapeResult<()> {
    let classification = classify(workbook.sheet_names(), catalog);
    report.log.info(format!(
        "📄 Sheets detected: Column-style {}, Row-style {}",
        classification.column_sheets.len(),
        classification.row_sheets.len()
    ));
    if !classification.ignored.is_empty() {
        report.log.warning(format!(
            "Ignored sheets: {}",
            classification.ignored.join(", ")
        ));
    }
    report.classification = classification.clone();

    // Row-style sheets
    let mut row_sheets: Vec<(String, Table)> = Vec::new();
    for name in &classification.row_sheets {
        let table = clean_row_sheet(workbook.load_table(name)?, name);
        report
            .log
            .info_indent(format!("Processed row-style sheet: {}", name), 1);
        row_sheets.push((name.clone(), table));
    }

    if !row_sheets.is_empty() {
        let summary = row_summary(row_sheets.iter().map(|(_, t)| t));
        let mut sheets: Vec<(&str, &Table)> = vec![(SUMMARY_SHEET, &summary)];
        sheets.extend(row_sheets.iter().map(|(n, t)| (n.as_str(), t)));

        report
            .outputs
            .push(OutputFile::build(OutputKind::RowStyle, &sheets)?);
        report.log.success("Row-style sheets processed");
    }

    // Column-style sheets
    let filter = ColumnFilter::new(&catalog.summary_keywords)?;
    let mut column_sheets: Vec<(String, Table)> = Vec::new();
    let mut projections: Vec<Table> = Vec::new();
    for name in &classification.column_sheets {
        let table = clean_column_sheet(workbook.load_table(name)?);
        projections.push(column_projection(&table, name, &filter));
        report
            .log
            .info_indent(format!("Processed column-style sheet: {}", name), 1);
        column_sheets.push((name.clone(), table));
    }

    let column_summary = if column_sheets.is_empty() {
        None
    } else {
        Some(Table::stack(&projections))
    };

    if let Some(summary) = &column_summary {
        let mut sheets: Vec<(&str, &Table)> = vec![(SUMMARY_SHEET, summary)];
        sheets.extend(column_sheets.iter().map(|(n, t)| (n.as_str(), t)));

        report
            .outputs
            .push(OutputFile::build(OutputKind::ColumnStyle, &sheets)?);
        report.log.success("Column-style sheets processed");
    }

    // Final restructured workbook
    let mut sheets: Vec<(&str, &Table)> = Vec::new();
    if let Some(summary) = &column_summary {
        sheets.push((SUMMARY_SHEET, summary));
    }
    sheets.extend(column_sheets.iter().map(|(n, t)| (n.as_str(), t)));
    sheets.extend(row_sheets.iter().map(|(n, t)| (n.as_str(), t)));

    report
        .outputs
        .push(OutputFile::build(OutputKind::Final, &sheets)?);

    Ok(())
}
