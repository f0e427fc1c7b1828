//! Human-readable and serializable job reports.

use serde::Serialize;
use std::fmt;

use super::error::ItemFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportOutcome {
    /// Still processing; only seen when a report is requested mid-job
    InProgress,
    /// Library saved (some items may still have failed)
    Completed,
    /// Every file was processed but the library could not be written
    SaveFailed,
    /// Stopped before any work by a pre-flight error
    Aborted,
    /// Stopped by the host between ticks
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub outcome: ImportOutcome,
    pub total_files: usize,
    pub processed: usize,
    pub saved_count: usize,
    pub output_path: Option<String>,
    pub brush_names: Vec<String>,
    pub failures: Vec<ItemFailure>,
    pub error: Option<String>,
}

impl ImportSummary {
    pub fn is_success(&self) -> bool {
        self.outcome == ImportOutcome::Completed
    }

    pub fn failed_filenames(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.filename.as_str()).collect()
    }

    fn write_failures(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.failures.is_empty() {
            write!(f, "\nSome files failed: {}", self.failed_filenames().join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            ImportOutcome::Completed => {
                write!(
                    f,
                    "Saved {} brush assets in: {}",
                    self.saved_count,
                    self.output_path.as_deref().unwrap_or("")
                )?;
                write!(f, "\nOpen the library in an asset browser to review previews.")?;
                self.write_failures(f)
            }
            ImportOutcome::SaveFailed => {
                write!(
                    f,
                    "{}\nConverted {} of {} files, but nothing was written.",
                    self.error.as_deref().unwrap_or("Failed to save library"),
                    self.saved_count,
                    self.total_files
                )?;
                self.write_failures(f)
            }
            ImportOutcome::Aborted => {
                write!(f, "{}", self.error.as_deref().unwrap_or("Import aborted"))
            }
            ImportOutcome::Cancelled => {
                write!(
                    f,
                    "Import cancelled after {} of {} files; {} brush assets were created but not saved.",
                    self.processed, self.total_files, self.saved_count
                )?;
                self.write_failures(f)
            }
            ImportOutcome::InProgress => {
                write!(f, "Importing: {} of {} files", self.processed, self.total_files)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(outcome: ImportOutcome) -> ImportSummary {
        ImportSummary {
            outcome,
            total_files: 3,
            processed: 3,
            saved_count: 2,
            output_path: Some("/tmp/out.brushlib".to_string()),
            brush_names: vec!["a_Brush".to_string(), "b_Brush".to_string()],
            failures: vec![ItemFailure {
                filename: "c.png".to_string(),
                description: "corrupt".to_string(),
            }],
            error: None,
        }
    }

    #[test]
    fn completed_report_lists_count_path_and_failures() {
        let text = summary(ImportOutcome::Completed).to_string();
        assert!(text.starts_with("Saved 2 brush assets in: /tmp/out.brushlib"));
        assert!(text.ends_with("Some files failed: c.png"));
    }

    #[test]
    fn completed_report_omits_failure_line_when_clean() {
        let mut clean = summary(ImportOutcome::Completed);
        clean.failures.clear();
        assert!(!clean.to_string().contains("failed"));
    }

    #[test]
    fn save_failure_report_mentions_partial_success() {
        let mut failed = summary(ImportOutcome::SaveFailed);
        failed.error = Some("Failed to save library /x: denied".to_string());
        let text = failed.to_string();
        assert!(text.starts_with("Failed to save library /x: denied"));
        assert!(text.contains("Converted 2 of 3 files"));
    }

    #[test]
    fn summary_serializes_camel_case() {
        let json = serde_json::to_value(summary(ImportOutcome::Completed)).unwrap_or_default();
        assert_eq!(json["outcome"], "completed");
        assert_eq!(json["savedCount"], 2);
        assert_eq!(json["failures"][0]["filename"], "c.png");
    }
}
