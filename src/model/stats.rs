//! Result and accumulator types.
//!
//! Counters are explicit structs threaded through calls and folded by the
//! caller — there is no ambient mutable state shared across report files.

/// Result of one download attempt sequence for a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// `true` only if the full body was written without error.
    pub success: bool,
    /// Number of attempts actually made (1..=max_attempts).
    pub attempts: u32,
    /// Bytes written to disk on success, 0 on failure.
    pub bytes_written: u64,
}

/// Running download counters, per report file and per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadStats {
    /// Attachments with a valid URL that entered the download loop.
    pub total_files: u64,
    /// Downloads that completed fully.
    pub successful_downloads: u64,
    /// Downloads that exhausted all attempts or hit an unrecoverable error.
    pub failed_downloads: u64,
    /// Attachments skipped because their URL failed validation.
    pub invalid_urls: u64,
    /// Students that had at least one downloadable file.
    pub students_processed: u64,
    /// Total bytes written across all successful downloads.
    pub bytes_written: u64,
}

impl DownloadStats {
    /// Fold one file's outcome into the counters.
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        self.total_files += 1;
        if outcome.success {
            self.successful_downloads += 1;
            self.bytes_written += outcome.bytes_written;
        } else {
            self.failed_downloads += 1;
        }
    }

    /// Fold another accumulator into this one (per-file → per-run).
    pub fn merge(&mut self, other: &DownloadStats) {
        self.total_files += other.total_files;
        self.successful_downloads += other.successful_downloads;
        self.failed_downloads += other.failed_downloads;
        self.invalid_urls += other.invalid_urls;
        self.students_processed += other.students_processed;
        self.bytes_written += other.bytes_written;
    }

    /// Success percentage over attempted downloads, 0.0 when nothing ran.
    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            self.successful_downloads as f64 / self.total_files as f64 * 100.0
        }
    }
}

/// Processing status of one report file, rendered in the summary CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Submissions were found and a CSV was written.
    Success,
    /// The report decoded fine but contained no submissions with attachments.
    NoData,
    /// The report could not be read or decoded.
    Failed(String),
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::Success => write!(f, "성공"),
            FileStatus::NoData => write!(f, "데이터 없음"),
            FileStatus::Failed(reason) => write!(f, "오류: {reason}"),
        }
    }
}

/// Per-report result used by the summary CSVs and the console table.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// Report file name (with extension).
    pub filename: String,
    /// Number of students with at least one submission.
    pub students: usize,
    /// Total submissions across those students.
    pub submissions: usize,
    /// Processing status.
    pub status: FileStatus,
}

impl FileOutcome {
    /// Average submissions per student, 0.0 when no students.
    pub fn average_submissions(&self) -> f64 {
        if self.students == 0 {
            0.0
        } else {
            self.submissions as f64 / self.students as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_success_and_failure() {
        let mut stats = DownloadStats::default();
        stats.record(&DownloadOutcome {
            success: true,
            attempts: 1,
            bytes_written: 1024,
        });
        stats.record(&DownloadOutcome {
            success: false,
            attempts: 3,
            bytes_written: 0,
        });

        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.successful_downloads, 1);
        assert_eq!(stats.failed_downloads, 1);
        assert_eq!(stats.bytes_written, 1024);
        assert!((stats.success_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_merge_folds_all_counters() {
        let mut total = DownloadStats::default();
        let per_file = DownloadStats {
            total_files: 3,
            successful_downloads: 2,
            failed_downloads: 1,
            invalid_urls: 1,
            students_processed: 2,
            bytes_written: 2048,
        };
        total.merge(&per_file);
        total.merge(&per_file);

        assert_eq!(total.total_files, 6);
        assert_eq!(total.students_processed, 4);
        assert_eq!(total.bytes_written, 4096);
    }

    #[test]
    fn test_file_status_display() {
        assert_eq!(FileStatus::Success.to_string(), "성공");
        assert_eq!(FileStatus::NoData.to_string(), "데이터 없음");
        assert_eq!(
            FileStatus::Failed("broken".into()).to_string(),
            "오류: broken"
        );
    }
}
