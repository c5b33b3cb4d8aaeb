//! Text-level threat scanning of uploaded bytes.
//!
//! Only content that decodes as UTF-8 is scanned. Genuine image data and most
//! real-world PDFs are binary and fall through as [`TextDecoding::Binary`];
//! PDFs get a byte-level pass later in [`super::pdf`].

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextDecoding<'a> {
    Decoded(&'a str),
    Binary,
}

pub fn try_decode_utf8(bytes: &[u8]) -> TextDecoding<'_> {
    match std::str::from_utf8(bytes) {
        Ok(text) => TextDecoding::Decoded(text),
        Err(_) => TextDecoding::Binary,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ThreatPattern {
    pub name: &'static str,
    pub needle: &'static [u8],
    pub ignore_case: bool,
    /// The match must not continue into an alphanumeric byte (`/JS` vs `/JSON`).
    pub delimited: bool,
}

const fn pattern(name: &'static str, needle: &'static [u8], ignore_case: bool, delimited: bool) -> ThreatPattern {
    ThreatPattern { name, needle, ignore_case, delimited }
}

pub const DANGEROUS_PATTERNS: &[ThreatPattern] = &[
    pattern("script tag", b"<script", true, false),
    pattern("javascript uri", b"javascript:", true, false),
    pattern("vbscript uri", b"vbscript:", true, false),
    pattern("pdf javascript", b"/JavaScript", false, false),
    pattern("pdf js action", b"/JS", false, true),
    pattern("pdf submit form", b"/SubmitForm", false, false),
    pattern("pdf uri action", b"/URI", false, true),
    pattern("shell shebang", b"#!/bin/", false, false),
    pattern("shell shebang", b"#!/usr/bin/", false, false),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Clean,
    Binary,
    Threat(&'static str),
}

impl ScanOutcome {
    pub fn is_threat(&self) -> bool {
        matches!(self, ScanOutcome::Threat(_))
    }
}

pub struct ContentThreatScanner;

impl ContentThreatScanner {
    pub fn scan(bytes: &[u8]) -> ScanOutcome {
        match try_decode_utf8(bytes) {
            TextDecoding::Binary => {
                debug!(len = bytes.len(), "content is binary, skipping text scan");
                ScanOutcome::Binary
            }
            TextDecoding::Decoded(text) => match Self::first_match(text.as_bytes(), DANGEROUS_PATTERNS) {
                Some(p) => ScanOutcome::Threat(p.name),
                None => ScanOutcome::Clean,
            },
        }
    }

    pub fn first_match(haystack: &[u8], patterns: &'static [ThreatPattern]) -> Option<&'static ThreatPattern> {
        patterns.iter().find(|p| contains_pattern(haystack, p))
    }
}

pub fn contains_pattern(haystack: &[u8], p: &ThreatPattern) -> bool {
    let n = p.needle.len();
    if n == 0 || haystack.len() < n {
        return false;
    }

    (0..=haystack.len() - n).any(|i| {
        let window = &haystack[i..i + n];
        let hit = if p.ignore_case {
            window.eq_ignore_ascii_case(p.needle)
        } else {
            window == p.needle
        };
        hit && !(p.delimited && haystack.get(i + n).is_some_and(|b| b.is_ascii_alphanumeric()))
    })
}

pub fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    find_bytes(haystack, needle).is_some()
}

pub fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
