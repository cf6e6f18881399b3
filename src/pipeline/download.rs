//! Download mode: fetch every valid attachment into the per-class tree.
//!
//! Layout: `downloads/<class>/<student>/<resolved_filename>`, with a
//! `<stem>_정보.txt` sidecar next to each downloaded file.

use std::path::Path;

use crate::config::Config;
use crate::error::{ReportError, Result};
use crate::export::{filename, info};
use crate::fetch::Fetcher;
use crate::model::stats::{DownloadOutcome, DownloadStats};
use crate::model::submission::SubmissionRecord;
use crate::parser::report;
use crate::pipeline::{class_name, collect_submissions, find_report_files, Progress};

/// Display name used in the download tree for members without one.
const UNNAMED_FOLDER: &str = "이름_없음";

/// Download every report's attachments under `download_root`.
///
/// Per-report failures (unreadable JSON) are logged and skipped; network
/// failures are retried by the fetcher and then counted. The run never
/// aborts because of a single record.
pub fn run_download(
    config: &Config,
    input_dir: &Path,
    download_root: &Path,
    progress: Progress<'_>,
) -> Result<DownloadStats> {
    let files = find_report_files(input_dir)?;
    std::fs::create_dir_all(download_root).map_err(|e| ReportError::io(download_root, e))?;

    let fetcher = Fetcher::new(&config.download)?;
    let mut totals = DownloadStats::default();
    let total = files.len();

    for (i, path) in files.iter().enumerate() {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("report.json");
        progress(i, total, name);

        match report::load_report(path) {
            Ok(decoded) => {
                let stats = download_report(config, &fetcher, path, &decoded, download_root);
                totals.merge(&stats);
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "Skipping unreadable report");
            }
        }
    }
    progress(total, total, "");

    Ok(totals)
}

/// Download one report's attachments. Returns the per-file counters.
fn download_report(
    config: &Config,
    fetcher: &Fetcher,
    report_path: &Path,
    decoded: &report::ClassReport,
    download_root: &Path,
) -> DownloadStats {
    let class_dir = download_root.join(filename::sanitize(&class_name(report_path)));
    if let Err(e) = std::fs::create_dir_all(&class_dir) {
        tracing::warn!(dir = %class_dir.display(), error = %e, "Cannot create class folder");
        return DownloadStats::default();
    }

    let mut stats = DownloadStats::default();

    for (student_name, records) in collect_submissions(decoded) {
        let folder_name = if student_name == report::UNNAMED_STUDENT {
            UNNAMED_FOLDER.to_string()
        } else {
            filename::sanitize(&student_name)
        };
        let student_dir = class_dir.join(folder_name);
        if let Err(e) = std::fs::create_dir_all(&student_dir) {
            tracing::warn!(
                student = %student_name,
                dir = %student_dir.display(),
                error = %e,
                "Cannot create student folder, skipping student"
            );
            continue;
        }

        let mut student_files: u64 = 0;
        let mut student_downloads: u64 = 0;

        for (index, record) in records.iter().enumerate() {
            let Some(url) = record.attachment.download_url() else {
                tracing::warn!(
                    student = %student_name,
                    descriptor = ?record.attachment.file_name,
                    "Invalid attachment URL, skipping"
                );
                stats.invalid_urls += 1;
                continue;
            };

            student_files += 1;

            let outcome = download_submission(fetcher, &student_dir, index, record, url);
            stats.record(&outcome);
            if outcome.success {
                student_downloads += 1;
            }

            // Fixed pacing between files, success or failure, to avoid
            // overloading the remote server.
            std::thread::sleep(config.download.pacing());
        }

        if student_files > 0 {
            stats.students_processed += 1;
            tracing::info!(
                student = %student_name,
                downloaded = student_downloads,
                attempted = student_files,
                "Student processed"
            );
        }
    }

    stats
}

/// Fetch one submission into `student_dir` and write its info sidecar.
///
/// `url` must already have passed
/// [`download_url`](crate::model::attachment::ParsedAttachment::download_url)
/// validation. `index` numbers the fallback filename for records that carry
/// no display name.
pub fn download_submission(
    fetcher: &Fetcher,
    student_dir: &Path,
    index: usize,
    record: &SubmissionRecord,
    url: &str,
) -> DownloadOutcome {
    let desired = record
        .attachment
        .file_name
        .clone()
        .unwrap_or_else(|| format!("과제_{}", index + 1));
    let dest = filename::resolve(
        student_dir,
        &desired,
        record.attachment.file_type.as_deref(),
        url,
    );

    let outcome = fetcher.fetch(url, &dest);
    if outcome.success {
        if let Err(e) = info::write_info_file(&dest, record) {
            tracing::warn!(file = %dest.display(), error = %e, "Info sidecar failed");
        }
    }
    outcome
}
