//! The extract / download pipeline.
//!
//! One pipeline walks the batch of exported reports; the selected mode
//! (the CLI subcommand) decides what happens per submission: record it
//! ([`extract`]) or download its file ([`download`]). Both modes share the
//! same traversal. Execution is strictly sequential: one report, one
//! student, one assignment, one download at a time.

pub mod download;
pub mod extract;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};
use crate::model::submission::{
    SubmissionRecord, NO_CREATED, NO_REVIEW, NO_SUBJECT, NO_SUBMIT_SUBJECT,
};
use crate::parser::attachment;
use crate::parser::report::ClassReport;

/// Progress callback: `(current_file, total_files, file_name)`.
pub type Progress<'a> = &'a dyn Fn(usize, usize, &str);

/// Find the `*.json` report files in a folder, sorted by name.
pub fn find_report_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(ReportError::FileNotFound(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| ReportError::io(dir, e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();

    files.sort();
    Ok(files)
}

/// Flatten a report into submissions grouped and sorted by student name.
///
/// Entries without a `member` block and assignments without an attachment
/// descriptor are skipped. Missing text fields get the export's placeholder
/// strings.
pub fn collect_submissions(report: &ClassReport) -> BTreeMap<String, Vec<SubmissionRecord>> {
    let mut by_student: BTreeMap<String, Vec<SubmissionRecord>> = BTreeMap::new();

    for member_stats in &report.stats_by_member {
        let Some(member) = &member_stats.member else {
            continue;
        };
        let student_name = member.name().to_string();

        for assignment in &member_stats.assignments {
            let Some(descriptor) = &assignment.submit_attachments else {
                continue;
            };

            let record = SubmissionRecord {
                student_name: student_name.clone(),
                subject: assignment
                    .subject
                    .clone()
                    .unwrap_or_else(|| NO_SUBJECT.to_string()),
                submit_subject: assignment
                    .submit_subject
                    .clone()
                    .unwrap_or_else(|| NO_SUBMIT_SUBJECT.to_string()),
                attachment: attachment::parse(descriptor),
                submit_created: assignment
                    .submit_created
                    .clone()
                    .unwrap_or_else(|| NO_CREATED.to_string()),
                submit_review: assignment
                    .submit_review
                    .clone()
                    .unwrap_or_else(|| NO_REVIEW.to_string()),
            };

            by_student.entry(student_name.clone()).or_default().push(record);
        }
    }

    by_student
}

/// Class name for a report file: its stem.
pub fn class_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("class")
        .to_string()
}
