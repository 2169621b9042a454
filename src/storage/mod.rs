// Report file storage (local filesystem)

use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tracing::warn;

use crate::models::UserReport;
use crate::types::{AppError, AppResult};

/// Reads generated report bodies from the directory the analyzer writes into.
#[derive(Debug, Clone)]
pub struct ReportStorage {
    root: PathBuf,
}

impl ReportStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a stored filename under the report root.
    /// Absolute paths and parent-directory components are refused.
    pub fn resolve(&self, filename: &str) -> AppResult<PathBuf> {
        let relative = Path::new(filename);
        let is_plain = !filename.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

        if !is_plain {
            return Err(AppError::Storage(format!(
                "Report filename escapes storage root: {}",
                filename
            )));
        }

        Ok(self.root.join(relative))
    }

    pub async fn read_markdown(&self, report: &UserReport) -> AppResult<String> {
        let path = self.resolve(&report.filename)?;

        match fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(report_id = report.report_id, path = %path.display(), "Report file missing");
                Err(AppError::NotFound("Report file not found".to_string()))
            }
            Err(e) => Err(AppError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn report(filename: &str) -> UserReport {
        UserReport {
            report_id: 1,
            user_id: 1,
            filename: filename.to_string(),
            format: "md".to_string(),
            created_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_read_existing_report() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("acme")).unwrap();
        std::fs::write(temp_dir.path().join("acme/summary.md"), "# Acme\n\nFindings").unwrap();

        let storage = ReportStorage::new(temp_dir.path());
        let content = storage.read_markdown(&report("acme/summary.md")).await.unwrap();

        assert_eq!(content, "# Acme\n\nFindings");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ReportStorage::new(temp_dir.path());

        let err = storage.read_markdown(&report("gone.md")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_rejects_paths_outside_root() {
        let storage = ReportStorage::new("/srv/reports");

        tokio_test::assert_err!(storage.resolve("../etc/passwd"));
        tokio_test::assert_err!(storage.resolve("/etc/passwd"));
        tokio_test::assert_err!(storage.resolve("a/../../b.md"));
        tokio_test::assert_err!(storage.resolve(""));
        assert_eq!(
            storage.resolve("./x/report.md").unwrap(),
            PathBuf::from("/srv/reports/./x/report.md")
        );
    }
}
