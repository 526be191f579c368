//! HTTP API module.
//!
//! This module provides the HTTP server, the job store and the API types
//! for the upload page.

pub mod logs;
pub mod server;
pub mod store;
pub mod types;

pub use logs::*;
pub use server::{router, start_server, AppState};
pub use store::{JobStore, StoredJob};
pub use types::*;
