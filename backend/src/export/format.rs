//! Worksheet presentation: cell writing, date formats and column widths.

use chrono::{Datelike, Timelike};
use rust_xlsxwriter::{ExcelDateTime, Format, FormatBorder, Worksheet};

use crate::error::{ExportError, ExportResult};
use crate::models::{CellValue, Table};

/// Number format applied to date cells.
pub const DATE_FORMAT: &str = "yyyy-mm-dd";

/// Number format applied to time-of-day cells.
pub const TIME_FORMAT: &str = "hh:mm:ss";

/// Rendered width of a `YYYY-MM-DD` date.
pub const DATE_WIDTH: usize = 10;

/// Rendered width of an `hh:mm:ss` time.
pub const TIME_WIDTH: usize = 8;

/// Characters added to the widest entry of a column.
pub const WIDTH_PADDING: usize = 2;

const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// Formats shared by every sheet of one workbook.
pub struct SheetFormats {
    pub header: Format,
    pub date: Format,
    pub time: Format,
}

impl Default for SheetFormats {
    fn default() -> Self {
        Self {
            header: Format::new().set_bold().set_border(FormatBorder::Thin),
            date: Format::new().set_num_format(DATE_FORMAT),
            time: Format::new().set_num_format(TIME_FORMAT),
        }
    }
}

/// Display width of a cell once written.
pub fn rendered_width(cell: &CellValue) -> usize {
    match cell {
        CellValue::DateTime(_) => DATE_WIDTH,
        CellValue::Time(_) => TIME_WIDTH,
        other => other.render().chars().count(),
    }
}

/// Width of each column: the header or the widest cell, plus padding.
pub fn column_widths(table: &Table) -> Vec<usize> {
    let mut widths: Vec<usize> = table
        .columns()
        .iter()
        .map(|name| name.chars().count() + WIDTH_PADDING)
        .collect();

    for row in table.rows() {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(rendered_width(cell) + WIDTH_PADDING);
        }
    }
    widths
}

/// Write a table (header row first) and size its columns.
pub fn write_table(
    worksheet: &mut Worksheet,
    sheet_name: &str,
    table: &Table,
    formats: &SheetFormats,
) -> ExportResult<()> {
    if table.height() + 1 > MAX_ROWS || table.width() > MAX_COLUMNS {
        return Err(ExportError::TooLarge {
            sheet: sheet_name.to_string(),
            message: format!("{} rows x {} columns", table.height(), table.width()),
        });
    }

    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &formats.header)?;
    }

    for (row_idx, row) in table.rows().iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            write_cell(worksheet, row_num, col as u16, cell, formats)?;
        }
    }

    for (col, width) in column_widths(table).into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width as f64)?;
    }

    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    formats: &SheetFormats,
) -> ExportResult<()> {
    match cell {
        CellValue::Empty => {}
        CellValue::Text(s) if s.is_empty() => {}
        CellValue::Text(s) | CellValue::Error(s) => {
            worksheet.write_string(row, col, s)?;
        }
        CellValue::Number(n) => {
            worksheet.write_number(row, col, *n)?;
        }
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::DateTime(dt) => {
            // Dates are written without their time of day
            let date = dt.date();
            match ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8)
            {
                Ok(excel_date) => {
                    worksheet.write_datetime_with_format(row, col, &excel_date, &formats.date)?;
                }
                // Outside Excel's calendar (before 1900): keep the text
                Err(_) => {
                    worksheet.write_string(row, col, date.format("%Y-%m-%d").to_string())?;
                }
            }
        }
        CellValue::Time(time) => {
            let excel_time =
                ExcelDateTime::from_hms(time.hour() as u16, time.minute() as u8, time.second())?;
            worksheet.write_datetime_with_format(row, col, &excel_time, &formats.time)?;
        }
    }
    Ok(())
}
