//! HTTP Server for the reshaper API.
//!
//! Serves the upload page and REST endpoints for processing workbooks.
//!
//! # API Endpoints
//!
//! | Method | Path                                  | Description                    |
//! |--------|---------------------------------------|--------------------------------|
//! | GET    | `/`                                   | Upload page                    |
//! | GET    | `/health`                             | Health check                   |
//! | POST   | `/api/upload`                         | Upload a workbook to reshape   |
//! | GET    | `/api/download/{job_id}/{file_name}`  | Download a generated workbook  |
//! | GET    | `/api/logs`                           | SSE stream for real-time logs  |

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, Html, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::LOG_BROADCASTER;
use super::store::JobStore;
use super::types::{error_response, UploadResponse};
use crate::config::{TownshipCatalog, XLSX_MIME};
use crate::error::{ServerError, ServerResult};
use crate::transform::pipeline::reshape_bytes;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Shared state of the running server
pub struct AppState {
    pub catalog: TownshipCatalog,
    pub jobs: JobStore,
}

impl AppState {
    pub fn new(catalog: TownshipCatalog) -> Self {
        Self {
            catalog,
            jobs: JobStore::new(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(error_response(&self.to_string()))).into_response()
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/upload", post(upload_workbook))
        .route("/api/download/{job_id}/{file_name}", get(download))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(
    port: u16,
    catalog: TownshipCatalog,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(Arc::new(AppState::new(catalog)));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Reshaper server running on http://localhost:{}", port);
    println!("   GET  /                                - Upload page");
    println!("   POST /api/upload                      - Upload workbook");
    println!("   GET  /api/download/{{job}}/{{file}}      - Download result");
    println!("   GET  /api/logs                        - SSE log stream");
    println!("   GET  /health                          - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "reshaper",
        "version": env!("CARGO_PKG_VERSION"),
        "storedJobs": state.jobs.len(),
        "endpoints": {
            "upload": "POST /api/upload",
            "download": "GET /api/download/{job_id}/{file_name}",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Upload workbook endpoint
async fn upload_workbook(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ServerResult<Json<UploadResponse>> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?
                    .to_vec(),
            );
        }
    }

    let bytes = file_data.ok_or_else(|| ServerError::BadRequest("No file provided".into()))?;
    let file_name = file_name.unwrap_or_else(|| "upload.xlsx".to_string());

    println!("\n{}", "=".repeat(70));
    println!("📄 NEW UPLOAD: {} ({} bytes)", file_name, bytes.len());
    println!("{}\n", "=".repeat(70));

    let worker_state = Arc::clone(&state);
    let report = tokio::task::spawn_blocking(move || {
        reshape_bytes(&file_name, &bytes, &worker_state.catalog)
    })
    .await
    .map_err(|e| ServerError::Internal(e.to_string()))?;

    let job_id = state.jobs.insert(&report.file_name, report.outputs.clone());
    Ok(Json(UploadResponse::from_report(job_id, &report)))
}

/// Serve one generated workbook as an attachment
async fn download(
    State(state): State<Arc<AppState>>,
    Path((job_id, file_name)): Path<(String, String)>,
) -> ServerResult<Response> {
    let file = state
        .jobs
        .file(&job_id, &file_name)
        .ok_or_else(|| ServerError::NotFound(format!("{} in job {}", file_name, job_id)))?;

    let disposition = format!("attachment; filename=\"{}\"", file.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}
