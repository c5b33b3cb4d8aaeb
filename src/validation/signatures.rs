use std::collections::HashMap;

use lazy_static::lazy_static;

/// Bytes read from the start of a file for signature checks. Longer than any
/// registered signature so `infer` can also classify the head.
pub const SIGNATURE_HEAD_LEN: usize = 64;

/// Every `(offset, bytes)` part must be present for a signature to match.
pub type Signature = &'static [(usize, &'static [u8])];

const PDF: Signature = &[(0, b"%PDF")];
const JPEG: Signature = &[(0, &[0xFF, 0xD8, 0xFF])];
const PNG: Signature = &[(0, &[0x89, 0x50, 0x4E, 0x47])];
// RIFF alone is shared with WAV and AVI.
const WEBP: Signature = &[(0, b"RIFF"), (8, b"WEBP")];

lazy_static! {
    static ref SIGNATURES: HashMap<&'static str, Vec<Signature>> = {
        let mut m: HashMap<&'static str, Vec<Signature>> = HashMap::new();
        m.insert("application/pdf", vec![PDF]);
        m.insert("image/jpeg", vec![JPEG]);
        m.insert("image/png", vec![PNG]);
        m.insert("image/webp", vec![WEBP]);
        m
    };

    static ref EXTENSION_MIME: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("pdf", "application/pdf");
        m.insert("jpg", "image/jpeg");
        m.insert("jpeg", "image/jpeg");
        m.insert("png", "image/png");
        m.insert("webp", "image/webp");
        m
    };
}

/// Headers of native executables. Used to classify content, never to accept it.
const EXECUTABLE_SIGNATURES: &[(&str, &[u8])] = &[
    ("Windows PE", b"MZ"),
    ("ELF", &[0x7F, 0x45, 0x4C, 0x46]),
    ("Mach-O 32", &[0xFE, 0xED, 0xFA, 0xCE]),
    ("Mach-O 64", &[0xFE, 0xED, 0xFA, 0xCF]),
    ("Mach-O 64", &[0xCF, 0xFA, 0xED, 0xFE]),
    ("Mach-O Fat", &[0xCA, 0xFE, 0xBA, 0xBE]),
    ("WebAssembly", &[0x00, 0x61, 0x73, 0x6D]),
];

/// Strips parameters and lowercases: `Image/JPEG; q=1` becomes `image/jpeg`.
pub fn normalize_mime(mime: &str) -> String {
    mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase()
}

pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    EXTENSION_MIME.get(extension.to_ascii_lowercase().as_str()).copied()
}

pub struct MagicByteRegistry;

impl MagicByteRegistry {
    /// Signatures registered for a declared type, any of which is a match.
    pub fn signature_for(mime_type: &str) -> Option<&'static [Signature]> {
        SIGNATURES.get(normalize_mime(mime_type).as_str()).map(|v| v.as_slice())
    }

    /// `None` when no signature is registered for the type.
    pub fn matches(mime_type: &str, head: &[u8]) -> Option<bool> {
        Self::signature_for(mime_type).map(|sigs| sigs.iter().any(|sig| signature_matches(*sig, head)))
    }

    pub fn executable_kind(head: &[u8]) -> Option<&'static str> {
        EXECUTABLE_SIGNATURES
            .iter()
            .find(|(_, magic)| head.starts_with(magic))
            .map(|(name, _)| *name)
    }

    pub fn longest_signature() -> usize {
        SIGNATURES
            .values()
            .flatten()
            .flat_map(|sig| sig.iter())
            .map(|(offset, magic)| offset + magic.len())
            .chain(EXECUTABLE_SIGNATURES.iter().map(|(_, magic)| magic.len()))
            .max()
            .unwrap_or(0)
    }
}

fn signature_matches(sig: Signature, head: &[u8]) -> bool {
    sig.iter()
        .all(|(offset, magic)| head.get(*offset..).is_some_and(|rest| rest.starts_with(magic)))
}
