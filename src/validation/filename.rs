use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::MAX_FILENAME_LENGTH;

const MAX_BASE_LENGTH: usize = 100;
const MAX_EXTENSION_LENGTH: usize = 10;
const DEFAULT_EXTENSION: &str = "bin";
const DEFAULT_BASE: &str = "file";
const TIMESTAMP_DIGITS: usize = 13;

const DANGEROUS_CHARACTERS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Extensions that run code when opened on a typical desktop.
const EXECUTABLE_EXTENSIONS: &[&str] = &[
    "exe", "dll", "bat", "cmd", "com", "scr", "pif", "msi", "vbs", "vbe", "js", "jse", "wsf",
    "wsh", "ps1", "sh", "bash", "jar", "app", "hta", "lnk", "reg", "cpl",
];

/// Extensions a user expects to be inert documents or media.
const DECOY_EXTENSIONS: &[&str] = &[
    "pdf", "jpg", "jpeg", "png", "webp", "gif", "bmp", "tif", "tiff", "txt", "rtf", "doc", "docx",
    "xls", "xlsx", "ppt", "pptx", "csv", "mp3", "mp4", "mov", "avi", "wav", "zip",
];

fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Final extension, without the dot. Empty when there is none.
pub fn extension_of(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => ext,
        _ => "",
    }
}

/// `report.pdf.exe`: an executable final extension behind a document or media
/// extension. Dots elsewhere (`amazon.com.pdf`, `setup.v2.exe`) are fine.
pub fn has_double_extension(name: &str) -> bool {
    let segments: Vec<&str> = name.split('.').collect();
    if segments.len() < 3 || segments[0].is_empty() {
        return false;
    }
    let Some((last, inner)) = segments[1..].split_last() else {
        return false;
    };
    EXECUTABLE_EXTENSIONS.contains(&last.to_ascii_lowercase().as_str())
        && inner
            .iter()
            .any(|seg| DECOY_EXTENSIONS.contains(&seg.to_ascii_lowercase().as_str()))
}

pub struct FilenameSanitizer;

impl FilenameSanitizer {
    pub fn sanitize(name: &str) -> String {
        Self::sanitize_at(name, Utc::now().timestamp_millis())
    }

    /// Produces `<base>_<timestamp>.<ext>` using only `[A-Za-z0-9._-]`.
    ///
    /// A trailing `_<13 digits>` already on the base is replaced rather than
    /// stacked, so sanitizing twice only changes the timestamp.
    pub fn sanitize_at(name: &str, timestamp_millis: i64) -> String {
        let replaced: String = name.chars().map(|c| if is_safe_char(c) { c } else { '_' }).collect();
        let mut cleaned = collapse_dot_runs(&replaced);
        if cleaned.starts_with('.') {
            cleaned.insert(0, '_');
        }
        let cleaned = collapse_underscores(&cleaned);

        let (base, ext) = match cleaned.rsplit_once('.') {
            Some((base, ext)) => (base, ext),
            None => (cleaned.as_str(), ""),
        };

        let base = strip_timestamp_suffix(base);
        let base: String = base.chars().take(MAX_BASE_LENGTH).collect();
        let base = base.trim_end_matches(['_', '-']);
        let base = if base.is_empty() { DEFAULT_BASE } else { base };

        let ext: String = ext.chars().take(MAX_EXTENSION_LENGTH).collect::<String>().to_ascii_lowercase();
        let ext = if ext.is_empty() { DEFAULT_EXTENSION.to_string() } else { ext };

        format!("{}_{}.{}", base, timestamp_millis, ext)
    }
}

/// Any run of two or more dots is a traversal attempt and becomes a single `_`.
fn collapse_dot_runs(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '.' && chars.peek() == Some(&'.') {
            while chars.peek() == Some(&'.') {
                chars.next();
            }
            out.push('_');
        } else {
            out.push(c);
        }
    }
    out
}

fn collapse_underscores(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out
}

fn strip_timestamp_suffix(base: &str) -> &str {
    match base.rsplit_once('_') {
        Some((head, digits))
            if digits.len() == TIMESTAMP_DIGITS && digits.bytes().all(|b| b.is_ascii_digit()) =>
        {
            head
        }
        _ => base,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilenameViolation {
    PathTraversal,
    NullByteInjection,
    FilenameTooLong,
    DangerousCharacters,
}

impl fmt::Display for FilenameViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            FilenameViolation::PathTraversal => "PATH_TRAVERSAL",
            FilenameViolation::NullByteInjection => "NULL_BYTE_INJECTION",
            FilenameViolation::FilenameTooLong => "FILENAME_TOO_LONG",
            FilenameViolation::DangerousCharacters => "DANGEROUS_CHARACTERS",
        };
        f.write_str(code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilenameCheck {
    pub safe: bool,
    pub violation: Option<FilenameViolation>,
    pub message: String,
}

impl FilenameCheck {
    fn violation(violation: FilenameViolation, message: &str) -> Self {
        Self { safe: false, violation: Some(violation), message: message.to_string() }
    }
}

pub struct FilenameSafetyChecker;

impl FilenameSafetyChecker {
    /// Reports only the first violation, in a fixed order.
    pub fn check(name: &str) -> FilenameCheck {
        if name.contains("../") || name.contains("..\\") {
            return FilenameCheck::violation(
                FilenameViolation::PathTraversal,
                "Filename contains path traversal sequence",
            );
        }
        if name.contains('\0') {
            return FilenameCheck::violation(FilenameViolation::NullByteInjection, "Filename contains null bytes");
        }
        if name.chars().count() > MAX_FILENAME_LENGTH {
            return FilenameCheck::violation(
                FilenameViolation::FilenameTooLong,
                "Filename is too long (max 255 characters)",
            );
        }
        if name.contains(DANGEROUS_CHARACTERS) {
            return FilenameCheck::violation(
                FilenameViolation::DangerousCharacters,
                "Filename contains dangerous characters",
            );
        }

        FilenameCheck { safe: true, violation: None, message: "Filename is safe".to_string() }
    }
}
