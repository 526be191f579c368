//! Job Store - Keep generated workbooks available for download
//!
//! Files live in memory only. The store holds the most recent jobs and
//! drops the oldest once it is full.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::config::MAX_STORED_JOBS;
use crate::export::OutputFile;

/// Generated files of one upload
#[derive(Debug, Clone)]
pub struct StoredJob {
    /// Unique identifier
    pub id: String,
    /// Name of the uploaded workbook
    pub source_name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Files offered for download
    pub files: Vec<OutputFile>,
}

impl StoredJob {
    /// Find a file by its download name
    pub fn file(&self, file_name: &str) -> Option<&OutputFile> {
        self.files.iter().find(|f| f.file_name() == file_name)
    }
}

/// Bounded store of recent jobs, oldest first
pub struct JobStore {
    capacity: usize,
    jobs: Mutex<VecDeque<StoredJob>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::with_capacity(MAX_STORED_JOBS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            jobs: Mutex::new(VecDeque::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<StoredJob>> {
        // A panic while holding the lock leaves the queue itself intact
        self.jobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store files under a fresh job id and return it
    pub fn insert(&self, source_name: &str, files: Vec<OutputFile>) -> String {
        let job = StoredJob {
            id: Uuid::new_v4().to_string(),
            source_name: source_name.to_string(),
            created_at: Utc::now(),
            files,
        };
        let id = job.id.clone();

        let mut jobs = self.lock();
        while jobs.len() >= self.capacity {
            jobs.pop_front();
        }
        jobs.push_back(job);
        id
    }

    /// Get one file of a job
    pub fn file(&self, id: &str, file_name: &str) -> Option<OutputFile> {
        self.lock()
            .iter()
            .find(|j| j.id == id)
            .and_then(|j| j.file(file_name).cloned())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::OutputKind;
    use crate::models::Table;

    fn final_file() -> OutputFile {
        let table = Table::new(vec!["A".into()]);
        OutputFile::build(OutputKind::Final, &[("Kutkai", &table)]).unwrap()
    }

    #[test]
    fn test_insert_and_fetch() {
        let store = JobStore::new();
        let id = store.insert("upload.xlsx", vec![final_file()]);

        let file = store.file(&id, "Final_Restructured_Data.xlsx").unwrap();
        assert_eq!(file.sheet_names, vec!["Kutkai"]);
        assert!(store.file(&id, "Row_Style_Sheets.xlsx").is_none());
        assert!(store.file("unknown", "Final_Restructured_Data.xlsx").is_none());
    }

    #[test]
    fn test_oldest_job_evicted() {
        let store = JobStore::with_capacity(2);
        let name = "Final_Restructured_Data.xlsx";
        let first = store.insert("a.xlsx", vec![final_file()]);
        let second = store.insert("b.xlsx", vec![final_file()]);
        let third = store.insert("c.xlsx", vec![final_file()]);

        assert_eq!(store.len(), 2);
        assert!(store.file(&first, name).is_none());
        assert!(store.file(&second, name).is_some());
        assert!(store.file(&third, name).is_some());
    }
}
