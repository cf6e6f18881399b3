//! Attachment-descriptor parsing.
//!
//! The export encodes each submitted file as a single pipe-delimited string,
//! `"<type> | <name> | <url>"`. Real exports also contain a degenerate
//! multi-line variant where the URL sits on its own line, URLs with trailing
//! newline-separated junk, and fixed sentinel strings meaning "no attachment".
//! This parser tolerates all of them and never errors.

use crate::model::attachment::ParsedAttachment;

/// Separator between the type, name and URL segments.
const SEGMENT_SEPARATOR: &str = " | ";

/// Fixed strings the export uses for "no attachment present".
pub const NO_ATTACHMENT_SENTINELS: [&str; 2] = ["첨부없음", "-"];

/// `true` if the descriptor is one of the known "no attachment" sentinels.
pub fn is_sentinel(descriptor: &str) -> bool {
    NO_ATTACHMENT_SENTINELS.contains(&descriptor)
}

/// Parse one raw attachment descriptor into structured fields.
///
/// - Empty or sentinel input yields an all-absent result.
/// - With 3 or more `" | "` segments, segment 0 is the type, segment 1 the
///   name, and segments 2.. rejoined form the URL candidate — a URL that
///   itself contains `" | "` survives intact. Only the candidate's first
///   line is kept; the export sometimes appends type information after a
///   newline.
/// - With fewer than 3 segments, the descriptor's lines are scanned for one
///   starting with `https://`; the whole original string becomes the name.
pub fn parse(descriptor: &str) -> ParsedAttachment {
    if descriptor.is_empty() || is_sentinel(descriptor) {
        return ParsedAttachment::default();
    }

    let parts: Vec<&str> = descriptor.split(SEGMENT_SEPARATOR).collect();
    if parts.len() >= 3 {
        let file_type = parts[0].trim();
        let file_name = parts[1].trim();
        let url_candidate = parts[2..].join(SEGMENT_SEPARATOR);
        let url = first_line(&url_candidate);

        return ParsedAttachment {
            file_type: non_empty(file_type),
            file_name: non_empty(file_name),
            file_url: non_empty(url),
        };
    }

    // Malformed: no pipe structure. Take the first line that looks like an
    // https URL, keep the full original string as the name.
    let url = descriptor
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("https://"));

    ParsedAttachment {
        file_type: None,
        file_name: Some(descriptor.to_string()),
        file_url: url.map(str::to_string),
    }
}

/// First line of a candidate string, trimmed.
fn first_line(candidate: &str) -> &str {
    candidate.lines().next().unwrap_or("").trim()
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_descriptor() {
        let att = parse("pdf | hw1.pdf | https://x/y.pdf");
        assert_eq!(att.file_type.as_deref(), Some("pdf"));
        assert_eq!(att.file_name.as_deref(), Some("hw1.pdf"));
        assert_eq!(att.file_url.as_deref(), Some("https://x/y.pdf"));
    }

    #[test]
    fn test_parse_sentinels_yield_absent_fields() {
        assert!(parse("첨부없음").is_empty());
        assert!(parse("-").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_parse_url_with_trailing_newline_junk() {
        let att = parse("application/pdf | 과제.pdf | https://host/f.pdf\napplication/pdf");
        assert_eq!(
            att.file_url.as_deref(),
            Some("https://host/f.pdf"),
            "only the first line of the URL segment is the URL"
        );
    }

    #[test]
    fn test_parse_url_containing_separator_is_rejoined() {
        // A URL containing " | " spills into a 4th segment; it must be
        // rejoined, not truncated.
        let att = parse("pdf | a.pdf | https://host/a | b.pdf");
        assert_eq!(att.file_url.as_deref(), Some("https://host/a | b.pdf"));
    }

    #[test]
    fn test_parse_malformed_url_on_own_line() {
        let raw = "some label\nhttps://host/f\nextra";
        let att = parse(raw);
        assert_eq!(att.file_type, None);
        assert_eq!(att.file_name.as_deref(), Some(raw));
        assert_eq!(att.file_url.as_deref(), Some("https://host/f"));
    }

    #[test]
    fn test_parse_malformed_without_url() {
        let att = parse("no url here at all");
        assert_eq!(att.file_type, None);
        assert_eq!(att.file_name.as_deref(), Some("no url here at all"));
        assert_eq!(att.file_url, None);
    }
}
