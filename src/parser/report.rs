//! Exported class-report decoding.
//!
//! Reports are JSON files shaped as
//! `{"statsByMember": [{"member": {"displayName": ...}, "assignments": [...]}]}`.
//! Every field is optional: a missing `statsByMember`, `member` or
//! `assignments` degrades to "no data" rather than an error. Sentinel
//! attachment strings are dropped once, at the decoding boundary.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::{ReportError, Result};
use crate::parser::attachment;

/// Default display name when a member record carries none.
pub const UNNAMED_STUDENT: &str = "이름 없음";

/// One exported class report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassReport {
    /// Per-student statistics, in export order.
    #[serde(default, rename = "statsByMember")]
    pub stats_by_member: Vec<MemberStats>,
}

/// One student's block inside a report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberStats {
    /// Student identity; records without it are skipped during traversal.
    #[serde(default)]
    pub member: Option<Member>,

    /// The student's assignment entries.
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

/// Student identity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Member {
    /// Display name shown in the report UI.
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
}

/// One assignment entry belonging to a member.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Assignment {
    /// Assignment subject.
    #[serde(default)]
    pub subject: Option<String>,

    /// Title the student gave the submission.
    #[serde(default, rename = "submitSubject")]
    pub submit_subject: Option<String>,

    /// Raw attachment descriptor. Sentinel values ("첨부없음", "-") and empty
    /// strings are mapped to `None` during decoding, so downstream code sees
    /// presence/absence as an `Option`, not a magic string.
    #[serde(
        default,
        rename = "submitAttachments",
        deserialize_with = "de_attachment_descriptor"
    )]
    pub submit_attachments: Option<String>,

    /// Submission timestamp as an opaque string.
    #[serde(default, rename = "submitCreated")]
    pub submit_created: Option<String>,

    /// Free-form review text.
    #[serde(default, rename = "submitReview")]
    pub submit_review: Option<String>,
}

impl Member {
    /// Display name, or the export's placeholder when absent.
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(UNNAMED_STUDENT)
    }
}

/// Map sentinel and empty attachment strings to `None` at the decode boundary.
fn de_attachment_descriptor<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty() && !attachment::is_sentinel(s)))
}

/// Read and decode one report file.
///
/// Read and parse failures are reported as [`ReportError`] values; the
/// pipeline catches them per file and continues with the next report.
pub fn load_report(path: &Path) -> Result<ClassReport> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ReportError::FileNotFound(path.to_path_buf())
        } else {
            ReportError::io(path, e)
        }
    })?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| ReportError::InvalidReport {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
