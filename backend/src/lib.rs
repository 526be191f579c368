//! # Reshaper - Township workbook restructuring
//!
//! Reshaper takes a workbook with one sheet per township, sorts the sheets
//! into row-style and column-style townships, and exports cleaned copies
//! with summary tables.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌──────────────┐
//! │  Workbook   │────▶│   Parser    │────▶│  Transform  │────▶│ Export xlsx  │
//! │ (xlsx/ods)  │     │ (calamine)  │     │ (classify,  │     │ (row, column │
//! │             │     │             │     │  summarize) │     │  and final)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use reshaper::{reshape_file, TownshipCatalog};
//!
//! let report = reshape_file("registers.xlsx", &TownshipCatalog::default());
//! for file in &report.outputs {
//!     file.write_to_dir("out".as_ref()).unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Cell values and tables
//! - [`config`] - Constants and the township catalog
//! - [`parser`] - Workbook reading
//! - [`transform`] - Classification, cleaning, summaries and pipeline
//! - [`export`] - Workbook writing
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Reading
pub mod parser;

// Transformation
pub mod transform;

// Writing
pub mod export;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, ExportError, ReshapeError, ServerError, WorkbookError};

// =============================================================================
// Re-exports - Models and config
// =============================================================================

pub use config::TownshipCatalog;
pub use models::{CellValue, SheetCategory, Table};

// =============================================================================
// Re-exports - Reading and writing
// =============================================================================

pub use export::{write_workbook, OutputFile, OutputKind};
pub use parser::SourceWorkbook;

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{reshape_bytes, reshape_file, ReshapeReport};
pub use transform::{classify, Classification};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::logs::{LogEntry, LogLevel, ProcessingLog};
pub use api::types::{error_response, DownloadLink, UploadResponse};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
