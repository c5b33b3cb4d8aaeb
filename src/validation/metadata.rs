use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::filename::{extension_of, FilenameSanitizer};
use super::signatures::normalize_mime;
use crate::{FileCandidate, FileMetadata, FileTypeDetector, HashAlgorithm, Result};

const UPLOAD_TOKEN_LEN: usize = 9;

/// Builds metadata for a file that has already been accepted. Performs no
/// validation of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileMetadataGenerator {
    algorithm: HashAlgorithm,
}

impl FileMetadataGenerator {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    pub async fn generate(&self, file: &FileCandidate) -> Result<FileMetadata> {
        let bytes = file.read_all().await?;
        Ok(self.generate_from_bytes(file, &bytes, Utc::now()))
    }

    pub fn generate_from_bytes(&self, file: &FileCandidate, bytes: &[u8], now: DateTime<Utc>) -> FileMetadata {
        let millis = now.timestamp_millis();
        let sanitized_name = FilenameSanitizer::sanitize_at(&file.name, millis);
        let extension = extension_of(&sanitized_name).to_string();

        FileMetadata {
            original_name: file.name.clone(),
            sanitized_name,
            mime_type: normalize_mime(&file.declared_mime_type),
            extension,
            size: file.size,
            hash: self.hash(bytes),
            upload_id: upload_id(millis),
            detected_type: FileTypeDetector::detect(bytes),
            created_at: now,
        }
    }

    /// Hex digest of the exact bytes; the filename plays no part.
    pub fn hash(&self, bytes: &[u8]) -> String {
        match self.algorithm {
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(bytes)),
            HashAlgorithm::Blake3 => hex::encode(blake3::hash(bytes).as_bytes()),
        }
    }
}

fn upload_id(millis: i64) -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("upload_{}_{}", millis, &token[..UPLOAD_TOKEN_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocumentType, FileType};

    #[test]
    fn sha256_matches_known_digest() {
        let generator = FileMetadataGenerator::default();
        assert_eq!(
            generator.hash(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn blake3_differs_from_sha256() {
        let sha = FileMetadataGenerator::new(HashAlgorithm::Sha256).hash(b"abc");
        let b3 = FileMetadataGenerator::new(HashAlgorithm::Blake3).hash(b"abc");
        assert_eq!(b3.len(), 64);
        assert_ne!(sha, b3);
    }

    #[test]
    fn metadata_embeds_timestamp() {
        let file = FileCandidate::new("My Report.PDF", "application/pdf", b"%PDF-1.4\n%%EOF".to_vec());
        let now = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let meta = FileMetadataGenerator::default().generate_from_bytes(&file, b"%PDF-1.4\n%%EOF", now);

        assert_eq!(meta.sanitized_name, "My_Report_1700000000000.pdf");
        assert_eq!(meta.extension, "pdf");
        assert!(meta.upload_id.starts_with("upload_1700000000000_"));
        assert_eq!(meta.upload_id.len(), "upload_1700000000000_".len() + UPLOAD_TOKEN_LEN);
        assert_eq!(meta.detected_type, FileType::Document(DocumentType::Pdf));
        assert_eq!(meta.size, 14);
    }

    #[tokio::test]
    async fn generate_reads_content() {
        let file = FileCandidate::new("a.png", "image/png", vec![1, 2, 3]);
        let meta = FileMetadataGenerator::default().generate(&file).await.unwrap();
        assert_eq!(meta.hash, FileMetadataGenerator::default().hash(&[1, 2, 3]));
    }
}
