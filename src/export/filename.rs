//! Filesystem-safe, collision-free filenames for downloaded attachments.

use std::path::{Path, PathBuf};

/// Characters not allowed in filenames on common filesystems.
const INVALID_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Maximum filename length, leaving headroom for an extension and counter.
const MAX_NAME_CHARS: usize = 200;

/// Replace illegal and control characters with `_`, truncate, and trim
/// whitespace. Malformed descriptors can carry their whole multi-line text
/// into the desired name, so newlines and tabs must not survive.
pub fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if INVALID_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .take(MAX_NAME_CHARS)
        .collect();
    cleaned.trim().to_string()
}

/// Extension for a detected MIME type, from the export's fixed table.
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    match mime {
        "application/pdf" => Some("pdf"),
        "application/haansofthwp" => Some("hwp"),
        "application/haansofthwpx" => Some("hwpx"),
        "application/msword" => Some("doc"),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => Some("docx"),
        "text/plain" => Some("txt"),
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// Extension taken from the URL's path component, if any.
pub fn extension_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    Path::new(parsed.path())
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_string)
}

/// Produce a free target path for a desired display name.
///
/// The name is sanitized; if it lacks an extension, one is derived first
/// from the MIME table, then from the URL path, then omitted. Collisions are
/// resolved with a monotonic numeric counter.
pub fn resolve(dir: &Path, desired: &str, mime: Option<&str>, url: &str) -> PathBuf {
    let mut name = sanitize(desired);
    if name.is_empty() {
        name = "file".to_string();
    }

    if Path::new(&name).extension().is_none() {
        let ext = mime
            .and_then(extension_for_mime)
            .map(str::to_string)
            .or_else(|| extension_from_url(url));
        if let Some(ext) = ext {
            name = format!("{name}.{ext}");
        }
    }

    unique_path(&dir.join(name))
}

/// If `path` already exists, append a counter to make it unique.
///
/// Counters start at 1 and only ever increase, so a value is never reused
/// even when earlier candidates were created between calls.
pub fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parent = path.parent().unwrap_or(Path::new("."));

    for i in 1u32.. {
        let candidate = if ext.is_empty() {
            parent.join(format!("{stem}_{i}"))
        } else {
            parent.join(format!("{stem}_{i}.{ext}"))
        };
        if !candidate.exists() {
            return candidate;
        }
    }
    unreachable!("counter space exhausted");
}
