//! PDF-specific inspection that runs after the generic content scan.
//!
//! Works on raw bytes so binary PDFs are covered. Stream bodies are skipped by
//! that pass: each one is inflated with zlib and checked in full, or, when it is
//! not zlib data, only checked for the long markers that binary noise cannot
//! produce by chance.

use std::io::Read;
use std::ops::Range;

use flate2::read::ZlibDecoder;
use tracing::debug;

use super::content::{contains_bytes, contains_pattern, find_bytes, ThreatPattern};
use crate::{Rejection, ValidationConfig};

const JAVASCRIPT_PATTERNS: &[ThreatPattern] = &[
    ThreatPattern { name: "pdf javascript", needle: b"/JavaScript", ignore_case: false, delimited: false },
    ThreatPattern { name: "pdf js action", needle: b"/JS", ignore_case: false, delimited: true },
    ThreatPattern { name: "script tag", needle: b"<script", ignore_case: true, delimited: false },
];

const LAUNCH_PATTERN: ThreatPattern =
    ThreatPattern { name: "pdf launch action", needle: b"/Launch", ignore_case: false, delimited: true };

const OPAQUE_JAVASCRIPT_PATTERN: ThreatPattern =
    ThreatPattern { name: "pdf javascript", needle: b"/JavaScript", ignore_case: false, delimited: false };

const WARNINGS: &[(&[u8], &str)] = &[
    (b"/AcroForm", "PDF contains forms"),
    (b"/EmbeddedFile", "PDF contains embedded files"),
    (b"/OpenAction", "PDF contains automatic actions"),
    (b"/Encrypt", "PDF is encrypted; content could not be fully inspected"),
];

const TRUNCATED_WARNING: &str = "PDF appears truncated (missing %%EOF marker)";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfReport {
    pub warnings: Vec<String>,
    pub streams_inspected: usize,
}

/// Returns the accumulated warnings, or the first hard rejection found.
pub fn inspect_pdf(data: &[u8], config: &ValidationConfig) -> Result<PdfReport, Rejection> {
    let mut report = PdfReport::default();
    let streams = stream_ranges(data);

    for section in outside_streams(data, &streams) {
        check_section(section, &mut report)?;
    }

    for (index, range) in streams.iter().enumerate() {
        let body = &data[range.clone()];
        if config.inspect_pdf_streams && index < config.max_pdf_streams {
            if let Some(inflated) = inflate(body, config.max_inflated_stream_bytes) {
                report.streams_inspected += 1;
                check_section(&inflated, &mut report)?;
                continue;
            }
        }
        check_opaque(body)?;
    }

    if !contains_bytes(tail(data, 1024), b"%%EOF") {
        report.warnings.push(TRUNCATED_WARNING.to_string());
    }

    debug!(
        streams = report.streams_inspected,
        warnings = report.warnings.len(),
        "pdf inspection finished"
    );
    Ok(report)
}

fn check_section(section: &[u8], report: &mut PdfReport) -> Result<(), Rejection> {
    if JAVASCRIPT_PATTERNS.iter().any(|p| contains_pattern(section, p)) {
        return Err(Rejection::PdfJavaScript);
    }
    if contains_pattern(section, &LAUNCH_PATTERN) {
        return Err(Rejection::PdfLaunchAction);
    }

    for (needle, warning) in WARNINGS {
        if contains_bytes(section, needle) && !report.warnings.iter().any(|w| w == warning) {
            report.warnings.push(warning.to_string());
        }
    }
    Ok(())
}

/// Stream data that could not be decoded: only markers too long to occur in
/// image or other binary payloads by accident.
fn check_opaque(body: &[u8]) -> Result<(), Rejection> {
    if contains_pattern(body, &OPAQUE_JAVASCRIPT_PATTERN) {
        return Err(Rejection::PdfJavaScript);
    }
    if contains_pattern(body, &LAUNCH_PATTERN) {
        return Err(Rejection::PdfLaunchAction);
    }
    Ok(())
}

fn tail(data: &[u8], len: usize) -> &[u8] {
    &data[data.len().saturating_sub(len)..]
}

/// Byte ranges between a `stream` keyword and the next `endstream`, in order.
/// An unterminated stream runs to the end of the data.
pub fn stream_ranges(data: &[u8]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut cursor = 0;

    while let Some(rel) = find_bytes(&data[cursor..], b"stream") {
        let keyword = cursor + rel;
        let mut start = keyword + b"stream".len();

        if keyword >= 3 && &data[keyword - 3..keyword] == b"end" {
            cursor = start;
            continue;
        }

        if data[start..].starts_with(b"\r\n") {
            start += 2;
        } else if data[start..].starts_with(b"\n") || data[start..].starts_with(b"\r") {
            start += 1;
        } else {
            cursor = start;
            continue;
        }

        let Some(end_rel) = find_bytes(&data[start..], b"endstream") else {
            ranges.push(start..data.len());
            break;
        };
        ranges.push(start..start + end_rel);
        cursor = start + end_rel + b"endstream".len();
    }

    ranges
}

fn outside_streams<'a>(data: &'a [u8], streams: &[Range<usize>]) -> Vec<&'a [u8]> {
    let mut sections = Vec::with_capacity(streams.len() + 1);
    let mut cursor = 0;
    for range in streams {
        sections.push(&data[cursor..range.start]);
        cursor = range.end;
    }
    sections.push(&data[cursor..]);
    sections
}

/// Inflates a zlib body, stopping at `limit` bytes. Undecodable bodies yield `None`;
/// a body that fails midway still returns what was inflated before the error.
fn inflate(body: &[u8], limit: u64) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    let result = ZlibDecoder::new(body).take(limit).read_to_end(&mut out);

    match result {
        Ok(_) => Some(out),
        Err(_) if !out.is_empty() => Some(out),
        Err(e) => {
            debug!(error = %e, "stream is not zlib data");
            None
        }
    }
}
