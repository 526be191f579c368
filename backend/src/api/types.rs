//! REST API types for the upload page.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::transform::pipeline::ReshapeReport;

/// Response sent to the page after an upload is processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Unique job identifier
    pub job_id: String,

    /// Status: "success" or "error"
    pub status: String,

    /// Name of the uploaded file
    pub file_name: String,

    /// Sheet counts by category
    pub sheets: SheetCounts,

    /// Log lines of this pass, in order
    pub log: Vec<String>,

    /// Download offers, in the order the files were produced
    pub downloads: Vec<DownloadLink>,

    /// Message of the error that stopped the pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Number of sheets of each category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetCounts {
    pub column_style: usize,
    pub row_style: usize,
    pub ignored: usize,
}

/// One download button
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLink {
    pub label: String,
    pub file_name: String,
    pub url: String,
}

impl UploadResponse {
    /// Build the response for a report whose files are stored under `job_id`.
    pub fn from_report(job_id: String, report: &ReshapeReport) -> Self {
        let downloads = report
            .outputs
            .iter()
            .map(|file| DownloadLink {
                label: file.kind.label().to_string(),
                file_name: file.file_name().to_string(),
                url: format!("/api/download/{}/{}", job_id, file.file_name()),
            })
            .collect();

        UploadResponse {
            status: if report.is_success() { "success" } else { "error" }.to_string(),
            job_id,
            file_name: report.file_name.clone(),
            sheets: SheetCounts {
                column_style: report.classification.column_sheets.len(),
                row_style: report.classification.row_sheets.len(),
                ignored: report.classification.ignored.len(),
            },
            log: report.log.lines(),
            downloads,
            error: report.error.clone(),
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "log": [format!("❌ Error: {}", error)],
        "downloads": []
    })
}
