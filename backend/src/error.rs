//! Error types for the reshaping pipeline.
//!
//! - [`WorkbookError`] - Reading and parsing the uploaded workbook
//! - [`ExportError`] - Writing generated workbooks
//! - [`ConfigError`] - Township catalog loading and validation
//! - [`ReshapeError`] - Top-level processing pass errors
//! - [`ServerError`] - HTTP layer errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Workbook Reading Errors
// =============================================================================

/// Errors while opening or reading the uploaded workbook.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The bytes are not a workbook the reader understands.
    #[error("Unable to open workbook: {0}")]
    Open(String),

    /// A sheet could not be loaded.
    #[error("Unable to read sheet '{sheet}': {message}")]
    Sheet { sheet: String, message: String },

    /// Sheet is not part of the workbook.
    #[error("Sheet not found: {0}")]
    MissingSheet(String),
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while writing a generated workbook.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Spreadsheet writer failure.
    #[error("Spreadsheet writer error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Failed to write the file to disk.
    #[error("Failed to write file: {0}")]
    IoError(#[from] std::io::Error),

    /// Too many rows or columns for one worksheet.
    #[error("Sheet '{sheet}' exceeds worksheet limits: {message}")]
    TooLarge { sheet: String, message: String },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading the township catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Catalog file could not be read.
    #[error("Catalog IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Catalog file is not valid JSON.
    #[error("Catalog JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Catalog content breaks a sheet-name rule.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

// =============================================================================
// Reshape Errors (top-level)
// =============================================================================

/// Errors that abort a processing pass.
///
/// This is the error type returned by the pipeline stages; the pass itself
/// turns it into a single error log line.
#[derive(Debug, Error)]
pub enum ReshapeError {
    /// Workbook reading error.
    #[error("{0}")]
    Workbook(#[from] WorkbookError),

    /// Workbook writing error.
    #[error("{0}")]
    Export(#[from] ExportError),

    /// Summary column pattern could not be compiled.
    #[error("Invalid summary column pattern: {0}")]
    Pattern(#[from] regex::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Job or file not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for workbook reading.
pub type WorkbookResult<T> = Result<T, WorkbookError>;

/// Result type for workbook writing.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for pipeline stages.
pub type ReshapeResult<T> = Result<T, ReshapeError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
