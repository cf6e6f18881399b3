//! Per-download info sidecar.
//!
//! Each downloaded file gets a sibling `<stem>_정보.txt` recording where it
//! came from and when it was fetched.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};
use crate::model::submission::SubmissionRecord;

/// Suffix appended to the downloaded file's stem.
const INFO_SUFFIX: &str = "_정보.txt";

/// Path of the sidecar belonging to `downloaded`.
pub fn info_path_for(downloaded: &Path) -> PathBuf {
    let stem = downloaded
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file");
    let parent = downloaded.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}{INFO_SUFFIX}"))
}

/// Write the sidecar for a completed download.
pub fn write_info_file(downloaded: &Path, record: &SubmissionRecord) -> Result<()> {
    let path = info_path_for(downloaded);
    let mut file = std::fs::File::create(&path).map_err(|e| ReportError::io(&path, e))?;

    let att = &record.attachment;
    let fetched_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

    writeln!(file, "과제명: {}", record.subject).map_err(|e| ReportError::io(&path, e))?;
    writeln!(file, "제출제목: {}", record.submit_subject).map_err(|e| ReportError::io(&path, e))?;
    writeln!(file, "제출일시: {}", record.submit_created).map_err(|e| ReportError::io(&path, e))?;
    writeln!(file, "제출후기: {}", record.submit_review).map_err(|e| ReportError::io(&path, e))?;
    writeln!(file, "파일타입: {}", att.file_type.as_deref().unwrap_or("없음"))
        .map_err(|e| ReportError::io(&path, e))?;
    writeln!(file, "원본URL: {}", att.file_url.as_deref().unwrap_or("없음"))
        .map_err(|e| ReportError::io(&path, e))?;
    writeln!(file, "수집일시: {fetched_at}").map_err(|e| ReportError::io(&path, e))?;

    Ok(())
}
