//! Normalized attachment metadata.
//!
//! Absence is encoded in the fields, never as an error: a sentinel or
//! malformed descriptor simply yields `None`s.

/// Structured view of one attachment descriptor.
///
/// Produced once per descriptor by [`crate::parser::attachment::parse`],
/// never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParsedAttachment {
    /// MIME type as reported by the export (e.g. `"application/pdf"`).
    pub file_type: Option<String>,

    /// Display name of the submitted file. For malformed descriptors this is
    /// the entire original string.
    pub file_name: Option<String>,

    /// First-line URL extracted from the descriptor.
    pub file_url: Option<String>,
}

impl ParsedAttachment {
    /// `true` when no field could be extracted.
    pub fn is_empty(&self) -> bool {
        self.file_type.is_none() && self.file_name.is_none() && self.file_url.is_none()
    }

    /// The URL, but only if it is usable for download.
    ///
    /// A URL is usable when present and starting with `https://`; anything
    /// else must be skipped and counted as invalid by the caller.
    pub fn download_url(&self) -> Option<&str> {
        self.file_url
            .as_deref()
            .filter(|u| u.starts_with("https://"))
    }
}
