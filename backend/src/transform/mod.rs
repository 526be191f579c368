//! Transformation module.
//!
//! This module turns one uploaded workbook into the generated workbooks:
//! - Classify: Sort sheets into row-style and column-style townships
//! - Clean: Trim text and tag row-style sheets
//! - Summary: Build the two summary tables
//! - Pipeline: Main reshape pipeline

pub mod classify;
pub mod clean;
pub mod pipeline;
pub mod summary;

pub use classify::{classify, Classification};
pub use clean::{clean_column_sheet, clean_row_sheet, trim_text_cells};
pub use pipeline::*;
pub use summary::{column_projection, row_summary, ColumnFilter};
