//! CSV writers for submissions and run summaries.
//!
//! Output is UTF-8 with BOM for spreadsheet compatibility. Column headers
//! and unit suffixes (명/건) are Korean, like the reports they summarize.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use crate::error::{ReportError, Result};
use crate::model::stats::FileOutcome;
use crate::model::submission::SubmissionRecord;

/// UTF-8 byte-order marker expected by common spreadsheet tools.
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Submission CSV header.
const SUBMISSION_HEADER: &str = "학생이름,과제명,제출제목,파일형식,파일명,제출일시,제출후기,파일URL";

/// Summary CSV header.
const SUMMARY_HEADER: &str = "파일명,학생수,제출건수,평균제출건수,상태";

/// Detailed summary CSV header.
const DETAILED_HEADER: &str = "파일명,학생이름,제출건수";

/// Write one report's submissions, sorted by student name.
pub fn write_submissions_csv(
    submissions: &BTreeMap<String, Vec<SubmissionRecord>>,
    output_path: &Path,
) -> Result<()> {
    let mut file = create(output_path)?;
    writeln!(file, "{SUBMISSION_HEADER}").map_err(|e| ReportError::io(output_path, e))?;

    // BTreeMap iteration order gives the sorted-by-student layout.
    for records in submissions.values() {
        for record in records {
            let att = &record.attachment;
            writeln!(
                file,
                "{},{},{},{},{},{},{},{}",
                csv_escape(&record.student_name),
                csv_escape(&record.subject),
                csv_escape(&record.submit_subject),
                csv_escape(att.file_type.as_deref().unwrap_or("")),
                csv_escape(att.file_name.as_deref().unwrap_or("")),
                csv_escape(&record.submit_created),
                csv_escape(&record.submit_review),
                csv_escape(att.file_url.as_deref().unwrap_or("")),
            )
            .map_err(|e| ReportError::io(output_path, e))?;
        }
    }

    Ok(())
}

/// Write the cross-file summary: one row per report plus a totals row.
pub fn write_summary_csv(outcomes: &[FileOutcome], output_path: &Path) -> Result<()> {
    let mut file = create(output_path)?;
    writeln!(file, "{SUMMARY_HEADER}").map_err(|e| ReportError::io(output_path, e))?;

    for outcome in outcomes {
        writeln!(
            file,
            "{},{}명,{}건,{:.1}건/학생,{}",
            csv_escape(&outcome.filename),
            outcome.students,
            outcome.submissions,
            outcome.average_submissions(),
            csv_escape(&outcome.status.to_string()),
        )
        .map_err(|e| ReportError::io(output_path, e))?;
    }

    let total_students: usize = outcomes.iter().map(|o| o.students).sum();
    let total_submissions: usize = outcomes.iter().map(|o| o.submissions).sum();
    let successful = outcomes
        .iter()
        .filter(|o| o.status == crate::model::stats::FileStatus::Success)
        .count();
    let overall_avg = if total_students > 0 {
        total_submissions as f64 / total_students as f64
    } else {
        0.0
    };

    // Blank row, then the totals row.
    writeln!(file, ",,,,").map_err(|e| ReportError::io(output_path, e))?;
    writeln!(
        file,
        "=== 전체 요약 ===,{total_students}명 (총계),{total_submissions}건 (총계),\
         {overall_avg:.1}건/학생 (전체평균),{successful}/{} 파일 성공",
        outcomes.len()
    )
    .map_err(|e| ReportError::io(output_path, e))?;

    Ok(())
}

/// Write the per-file per-student submission counts.
///
/// Files are separated by a blank row; students are sorted within a file.
pub fn write_detailed_summary_csv(
    detailed: &[(String, BTreeMap<String, usize>)],
    output_path: &Path,
) -> Result<()> {
    let mut file = create(output_path)?;
    writeln!(file, "{DETAILED_HEADER}").map_err(|e| ReportError::io(output_path, e))?;

    for (filename, students) in detailed {
        for (student, count) in students {
            writeln!(
                file,
                "{},{},{}건",
                csv_escape(filename),
                csv_escape(student),
                count
            )
            .map_err(|e| ReportError::io(output_path, e))?;
        }
        writeln!(file, ",,").map_err(|e| ReportError::io(output_path, e))?;
    }

    Ok(())
}

/// Create the output file and write the BOM.
fn create(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }
    let mut file = std::fs::File::create(path).map_err(|e| ReportError::io(path, e))?;
    file.write_all(&UTF8_BOM)
        .map_err(|e| ReportError::io(path, e))?;
    Ok(file)
}

/// Escape a value for CSV (RFC 4180).
///
/// Wraps in double quotes if the value contains commas, quotes, or newlines.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
