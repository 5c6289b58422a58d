//! Report persistence on local disk

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::diagnosis::DiagnosisResult;
use crate::error::Result;
use crate::report::html;

/// Writes reports into a directory and lists what is already there
pub struct ReportStore {
    dir: PathBuf,
}

/// One report file on disk
#[derive(Debug, Clone, Serialize)]
pub struct StoredReport {
    pub file_name: String,
    pub pod_name: String,
    pub size_bytes: u64,
    pub modified: DateTime<Local>,
}

impl ReportStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist an explicitly requested report
    pub fn write_report(&self, result: &DiagnosisResult, extension: &str, content: &str) -> Result<PathBuf> {
        self.write(&result.pod_name, "report", extension, content)
    }

    /// Persist a report produced by the change monitor
    pub fn write_auto_report(&self, result: &DiagnosisResult) -> Result<PathBuf> {
        self.write(&result.pod_name, "auto", "html", &html::render(result))
    }

    fn write(&self, pod_name: &str, kind: &str, extension: &str, content: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = self.dir.join(format!("{}_{}_{}.{}", pod_name, kind, stamp, extension));
        fs::write(&path, content)?;
        Ok(path)
    }

    /// All reports in the directory, newest first.
    ///
    /// A missing directory is treated as empty rather than an error.
    pub fn list(&self) -> Result<Vec<StoredReport>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut reports = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().to_string();
            let Some(pod_name) = parse_pod_name(&file_name) else {
                continue;
            };
            reports.push(StoredReport {
                file_name,
                pod_name,
                size_bytes: metadata.len(),
                modified: DateTime::<Local>::from(metadata.modified()?),
            });
        }

        reports.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(reports)
    }
}

/// Extract the pod name from a report file name.
///
/// Pod names cannot contain underscores, so the first kind marker in
/// the stem is unambiguous. Returns None for files this store did not
/// produce.
fn parse_pod_name(file_name: &str) -> Option<String> {
    let (stem, _ext) = file_name.rsplit_once('.')?;
    let name = stem
        .split_once("_report_")
        .or_else(|| stem.split_once("_auto_"))
        .map(|(pod, _)| pod)?;
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}
