//! One qualifying assignment submission.

use super::attachment::ParsedAttachment;

/// Placeholder used when the export carries no assignment subject.
pub const NO_SUBJECT: &str = "과제명 없음";
/// Placeholder used when the export carries no submission title.
pub const NO_SUBMIT_SUBJECT: &str = "제출 제목 없음";
/// Placeholder used when the export carries no submission timestamp.
pub const NO_CREATED: &str = "날짜 없음";
/// Placeholder used when the export carries no review text.
pub const NO_REVIEW: &str = "후기 없음";

/// One assignment entry with a (possibly malformed) attachment descriptor.
///
/// Created during report traversal, consumed by the CSV writer or the
/// download pipeline, not persisted beyond the run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SubmissionRecord {
    /// Student display name.
    pub student_name: String,

    /// Assignment subject.
    pub subject: String,

    /// Title the student gave the submission.
    pub submit_subject: String,

    /// Normalized attachment metadata.
    pub attachment: ParsedAttachment,

    /// Submission timestamp, kept as the export's opaque string.
    pub submit_created: String,

    /// Free-form review text entered by the student.
    pub submit_review: String,
}
