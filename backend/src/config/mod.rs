//! Application configuration.
//!
//! Output names and limits are constants. The township catalog ships with
//! built-in lists and can be replaced by a JSON file given on the command
//! line or through the `RESHAPER_CATALOG` environment variable.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::models::SheetCategory;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Environment variable pointing at a catalog JSON file.
pub const CATALOG_ENV_VAR: &str = "RESHAPER_CATALOG";

/// Name of the derived summary sheet in generated workbooks.
pub const SUMMARY_SHEET: &str = "Summary";

/// Column forced onto row-style sheets and summary projections.
pub const TOWNSHIP_COLUMN: &str = "TOWNSHIP";

/// Column naming the source sheet of a column-style projection row.
pub const SOURCE_SHEET_COLUMN: &str = "SOURCE_SHEET";

/// Column name fragments kept by the column-style summary projection.
pub const DEFAULT_SUMMARY_KEYWORDS: &[&str] = &["registration", "visit"];

/// Row-style bundle file name.
pub const ROW_STYLE_FILE: &str = "Row_Style_Sheets.xlsx";

/// Column-style bundle file name.
pub const COLUMN_STYLE_FILE: &str = "Summary_and_Column_Sheets.xlsx";

/// Final restructured workbook file name.
pub const FINAL_FILE: &str = "Final_Restructured_Data.xlsx";

/// Sheet written when a generated workbook has no data sheets.
pub const PLACEHOLDER_SHEET: &str = "Sheet1";

/// Content type of every generated workbook.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Number of recent jobs whose files stay downloadable.
pub const MAX_STORED_JOBS: usize = 32;

/// Excel's limit on worksheet name length.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const DEFAULT_COLUMN_STYLE: &[&str] = &[
    "Kutkai", "Kunlong", "Muse", "Namhkan", "Namhsan", "Namtu", "Hseni", "Lashio", "Laukkaing",
];

const DEFAULT_ROW_STYLE: &[&str] = &[
    "Kyauktaw", "Myebon", "Minbya", "Mrauk-U", "Buthidaung", "Rathedaung", "Maungdaw", "Paletwa",
];

/// The two township name lists sheets are classified against.
///
/// Names are matched exactly and case-sensitively. `summary_keywords` are
/// matched case-insensitively against column-style headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownshipCatalog {
    pub column_style: Vec<String>,
    pub row_style: Vec<String>,
    #[serde(default = "default_summary_keywords")]
    pub summary_keywords: Vec<String>,
}

fn default_summary_keywords() -> Vec<String> {
    DEFAULT_SUMMARY_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

impl Default for TownshipCatalog {
    fn default() -> Self {
        Self {
            column_style: DEFAULT_COLUMN_STYLE.iter().map(|s| s.to_string()).collect(),
            row_style: DEFAULT_ROW_STYLE.iter().map(|s| s.to_string()).collect(),
            summary_keywords: default_summary_keywords(),
        }
    }
}

impl TownshipCatalog {
    /// Build a validated catalog from explicit lists.
    pub fn new(column_style: Vec<String>, row_style: Vec<String>) -> ConfigResult<Self> {
        let catalog = Self {
            column_style,
            row_style,
            summary_keywords: default_summary_keywords(),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Resolve the effective catalog.
    ///
    /// Precedence: explicit path, then `RESHAPER_CATALOG`, then built-in lists.
    /// `.env` is loaded by the binary at startup, not here.
    pub fn resolve(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match env::var(CATALOG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => Ok(Self::default()),
        }
    }

    /// Category of a sheet name.
    pub fn category_of(&self, sheet_name: &str) -> SheetCategory {
        if self.column_style.iter().any(|n| n == sheet_name) {
            SheetCategory::ColumnStyle
        } else if self.row_style.iter().any(|n| n == sheet_name) {
            SheetCategory::RowStyle
        } else {
            SheetCategory::Ignored
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Every name must be usable as a worksheet name next to `Summary`.
    fn validate(&self) -> ConfigResult<()> {
        if self.summary_keywords.iter().any(|k| k.is_empty()) {
            return Err(ConfigError::InvalidCatalog("empty summary keyword".into()));
        }

        let mut seen = HashSet::new();

        for name in self.column_style.iter().chain(&self.row_style) {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidCatalog("empty township name".into()));
            }
            if name.chars().count() > MAX_SHEET_NAME_LEN {
                return Err(ConfigError::InvalidCatalog(format!(
                    "'{}' is longer than {} characters",
                    name, MAX_SHEET_NAME_LEN
                )));
            }
            if name.eq_ignore_ascii_case(SUMMARY_SHEET) {
                return Err(ConfigError::InvalidCatalog(format!(
                    "'{}' is reserved for the summary sheet",
                    name
                )));
            }
            // Excel compares sheet names case-insensitively
            if !seen.insert(name.to_lowercase()) {
                return Err(ConfigError::InvalidCatalog(format!(
                    "'{}' is listed more than once",
                    name
                )));
            }
        }

        Ok(())
    }
}
