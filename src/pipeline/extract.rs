//! Extract mode: one CSV per report plus cross-file summaries.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::export::csv;
use crate::model::stats::{FileOutcome, FileStatus};
use crate::parser::report;
use crate::pipeline::{class_name, collect_submissions, find_report_files, Progress};

/// Everything an extract run produced, for the summary CSVs and the console.
#[derive(Debug, Default)]
pub struct ExtractRun {
    /// One outcome per report file, in processing order.
    pub outcomes: Vec<FileOutcome>,
    /// Per-file per-student submission counts.
    pub detailed: Vec<(String, BTreeMap<String, usize>)>,
}

impl ExtractRun {
    /// Total students with submissions across all reports.
    pub fn total_students(&self) -> usize {
        self.outcomes.iter().map(|o| o.students).sum()
    }

    /// Total submissions across all reports.
    pub fn total_submissions(&self) -> usize {
        self.outcomes.iter().map(|o| o.submissions).sum()
    }

    /// Reports that produced a CSV.
    pub fn successful_files(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == FileStatus::Success)
            .count()
    }
}

/// Process every report in `input_dir`, writing CSVs into `results_dir`.
///
/// A report that fails to read or decode is recorded as a failed outcome and
/// the run continues; nothing short of an unwritable results folder aborts
/// the batch.
pub fn run_extract(
    input_dir: &Path,
    results_dir: &Path,
    write_summaries: bool,
    progress: Progress<'_>,
) -> Result<ExtractRun> {
    let files = find_report_files(input_dir)?;
    std::fs::create_dir_all(results_dir)
        .map_err(|e| crate::error::ReportError::io(results_dir, e))?;

    let mut run = ExtractRun::default();
    let total = files.len();

    for (i, path) in files.iter().enumerate() {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("report.json")
            .to_string();
        progress(i, total, &filename);

        let outcome = match report::load_report(path) {
            Ok(decoded) => {
                let submissions = collect_submissions(&decoded);
                let students = submissions.len();
                let count: usize = submissions.values().map(Vec::len).sum();

                let status = if submissions.is_empty() {
                    tracing::info!(file = %filename, "No submissions with attachments");
                    FileStatus::NoData
                } else {
                    let csv_path = results_dir.join(format!("{}.csv", class_name(path)));
                    match csv::write_submissions_csv(&submissions, &csv_path) {
                        Ok(()) => {
                            tracing::info!(
                                file = %filename,
                                students,
                                submissions = count,
                                csv = %csv_path.display(),
                                "Wrote submissions CSV"
                            );
                            FileStatus::Success
                        }
                        Err(e) => {
                            tracing::warn!(file = %filename, error = %e, "CSV write failed");
                            FileStatus::Failed(e.to_string())
                        }
                    }
                };

                let counts: BTreeMap<String, usize> = submissions
                    .iter()
                    .map(|(name, records)| (name.clone(), records.len()))
                    .collect();
                run.detailed.push((filename.clone(), counts));

                FileOutcome {
                    filename,
                    students,
                    submissions: count,
                    status,
                }
            }
            Err(e) => {
                tracing::warn!(file = %filename, error = %e, "Skipping unreadable report");
                run.detailed.push((filename.clone(), BTreeMap::new()));
                FileOutcome {
                    filename,
                    students: 0,
                    submissions: 0,
                    status: FileStatus::Failed(e.to_string()),
                }
            }
        };

        run.outcomes.push(outcome);
    }
    progress(total, total, "");

    if write_summaries {
        csv::write_summary_csv(&run.outcomes, &results_dir.join("summary.csv"))?;
        csv::write_detailed_summary_csv(
            &run.detailed,
            &results_dir.join("detailed_summary.csv"),
        )?;
    }

    Ok(run)
}
