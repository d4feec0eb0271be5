use std::{fs, path::PathBuf};

use tracing::info;

use crate::core::utils::ensure_dir;

use super::{ReportSink, Result};

/// Writes each report to `<dir>/<name>.txt`, replacing the previous copy.
#[derive(Debug, Clone)]
pub struct FileReportSink {
    dir: PathBuf,
}

impl FileReportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn report_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.txt"))
    }
}

impl ReportSink for FileReportSink {
    fn publish(&self, name: &str, text: &str) -> Result<String> {
        ensure_dir(&self.dir)?;
        let path = self.report_path(name);
        fs::write(&path, text)?;
        info!(report = name, path = %path.display(), "report archived");
        Ok(path.display().to_string())
    }
}
